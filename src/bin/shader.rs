//! Full-screen shader plane driven by time, resolution and mouse

use vitrine::demos::ShaderDemo;

fn main() -> anyhow::Result<()> {
    vitrine::init_logging();
    vitrine::run(&ShaderDemo::new())?;
    Ok(())
}
