use anyhow::Result;
use std::path::Path;

use super::open_session;

pub fn run(path: &Path, password: Option<&str>) -> Result<()> {
    let session = open_session(path, password)?;
    let Some(doc) = session.document() else {
        anyhow::bail!("No PDF document open");
    };
    let info = doc.get_info();

    println!("File: {}", path.display());
    println!("Pages: {}", info.page_count);
    if doc.encrypted {
        println!("Encrypted: yes");
    }

    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }

    Ok(())
}
