use obfuscation::Obfuscate;

#[derive(Obfuscate)]
enum Event {
    Deleted,
}

fn main() {
    let _ = Event::Deleted;
}
