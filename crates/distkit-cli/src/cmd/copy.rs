use distkit_core::clipboard::{self, SystemClipboard};

pub fn run(value: &str, quiet: bool) -> anyhow::Result<()> {
    let mut sink = SystemClipboard::new()?;
    clipboard::copy(
        &mut sink,
        value,
        (!quiet).then_some(|v: &str| println!("Copied {} characters to clipboard", v.chars().count())),
    )?;
    Ok(())
}
