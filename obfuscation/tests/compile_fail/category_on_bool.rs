use obfuscation::Obfuscate;

#[derive(Obfuscate)]
struct Flags {
    #[obfuscate(UserName)]
    enabled: bool,
}

fn main() {
    let flags = Flags { enabled: true };
    let _ = flags.enabled;
}
