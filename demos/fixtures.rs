//! Writes the reference fixture images into a directory (`fixtures/` by default).

fn main() -> Result<(), pngfixture::Error> {
    let dir = std::env::args_os().nth(1).unwrap_or_else(|| "fixtures".into());
    for path in pngfixture::fixtures::write_all(dir)? {
        println!("Created {}", path.display());
    }
    Ok(())
}
