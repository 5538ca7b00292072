use std::path::Path;

use anyhow::{Context, Result};

use marquee_core::{AppConfig, LayoutDescription};
use marquee_ui::{build_page, render, terminal::TerminalRenderer};

pub fn run(config: &AppConfig, name: Option<&str>) -> Result<()> {
    let path = config.layout_path(name);
    let layout = LayoutDescription::load(&path)
        .with_context(|| format!("Cannot load layout {}", path.display()))?;
    let layout_dir = path.parent().unwrap_or(Path::new("."));

    let page = build_page(
        &layout,
        layout_dir,
        render::shared(TerminalRenderer::new()),
        config.ui.scroll,
    )?;

    println!("Layout {} ({}x{}):\n", path.display(), layout.width, layout.height);
    println!("  Components: {}", page.components().len());
    let skipped = layout.components.len() - page.components().len();
    if skipped > 0 {
        println!("  Skipped (layer out of range): {}", skipped);
    }

    if layout.menus.is_empty() {
        println!("  Menus: none, collections cannot be shown");
    }
    for (depth, menu) in layout.menus.iter().enumerate() {
        println!(
            "  Menu {}: {} points, {} images from {} search dirs",
            depth + 1,
            menu.points.len(),
            menu.image_type,
            menu.search_dirs.len()
        );
    }

    Ok(())
}
