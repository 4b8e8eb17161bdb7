//! Torus knot with physical material, shadows and a tuning panel

use vitrine::demos::PhysicalDemo;

fn main() -> anyhow::Result<()> {
    vitrine::init_logging();
    vitrine::run(&PhysicalDemo::new())?;
    Ok(())
}
