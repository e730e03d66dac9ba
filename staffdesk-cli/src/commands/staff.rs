//! Staff directory command.

use anyhow::Result;

use crate::render::Render;
use crate::services;

pub fn run() -> Result<()> {
    for member in services::staff_directory() {
        println!("{}", member.render());
    }
    Ok(())
}
