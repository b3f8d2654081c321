use anyhow::Result;

pub fn run() -> Result<()> {
    println!("tessera {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
