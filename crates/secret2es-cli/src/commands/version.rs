//! version command

pub fn run() {
    println!("secret2es version {}", env!("CARGO_PKG_VERSION"));
}
