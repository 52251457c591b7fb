use std::fs;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Print,
    Clipboard,
    Save,
}

pub fn handle_output(
    rendered: &str,
    target: &str,
    mode: OutputMode,
) -> Result<(), Box<dyn std::error::Error>> {
    match mode {
        OutputMode::Print => {
            println!("{}", rendered);
        }
        OutputMode::Clipboard => {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(rendered)?;
            eprintln!("Configuration copied to clipboard");
        }
        OutputMode::Save => {
            let path = format!("{}.json", target);
            fs::write(&path, format!("{}\n", rendered))?;
            eprintln!("Configuration written to {}", path);
        }
    }
    Ok(())
}
