use obfuscation::Obfuscate;

#[derive(Obfuscate)]
struct Download {
    #[obfuscate]
    count: u32,
}

fn main() {
    let download = Download { count: 1 };
    let _ = download.count;
}
