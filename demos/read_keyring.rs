//! Reads an ASCII armored public key block from a file (or stdin) and
//! prints a summary of the contained keys.
//!
//! ```sh
//! cargo run --example read_keyring -- key.asc
//! ```

use std::io::Read;

use pgp_keyring::KeyRing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    match KeyRing::from_armor_str(&input) {
        Ok(ring) => {
            println!("Got {} keys", ring.len());
            for key in ring.keys() {
                println!("  {:?} {:?}", key.algorithm(), key.fingerprint());
                for user in &key.users {
                    println!("    uid: {}", user.id);
                }
                for subkey in &key.public_subkeys {
                    println!("    sub: {:?} {:?}", subkey.algorithm(), subkey.key_id());
                }
            }
            for skipped in ring.skipped() {
                println!("  skipped key {}: {}", skipped.index, skipped.reason);
            }
        }
        Err(err) => {
            eprintln!("error reading key: {err}");
            std::process::exit(1);
        }
    }

    Ok(())
}
