use anyhow::{anyhow, Result};

use marquee_core::collection::ALL_PLAYLIST;
use marquee_core::{AppConfig, CollectionInfo, Item};

pub fn run(config: &AppConfig, collection: Option<&str>, playlist: Option<&str>, json: bool) -> Result<()> {
    let name = collection.unwrap_or(&config.general.collection);
    let collection = CollectionInfo::load(&config.collections_dir(), name)?;

    let playlist = playlist.unwrap_or(ALL_PLAYLIST);
    let items = collection.playlist(playlist).ok_or_else(|| {
        anyhow!(
            "No playlist '{}' in {}. Available: {}",
            playlist,
            collection.name,
            collection.playlist_names().join(", ")
        )
    })?;

    if json {
        let items: Vec<&Item> = items.iter().map(|item| &**item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{} / {} is empty.", collection.name, playlist);
        return Ok(());
    }

    println!("{} / {} ({}):\n", collection.name, playlist, items.len());
    for item in items.iter() {
        let kind = if item.leaf { "" } else { " [menu]" };
        let year = if item.year.is_empty() {
            String::new()
        } else {
            format!(" ({})", item.year)
        };
        println!("  {}{}{}", item.full_title, year, kind);
        if item.is_clone() {
            println!("    Clone of: {}", item.clone_of);
        }
        if !item.manufacturer.is_empty() {
            println!("    Manufacturer: {}", item.manufacturer);
        }
    }

    Ok(())
}
