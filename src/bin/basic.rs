//! Spinning lit cube

use vitrine::demos::BasicDemo;

fn main() -> anyhow::Result<()> {
    vitrine::init_logging();
    vitrine::run(&BasicDemo::new())?;
    Ok(())
}
