use notegraph_core::config::{ConfigLoader, default_config_path};
use notegraph_core::vault::VaultWalker;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL ngr doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = crate::logging::init(&rc.logging) {
        println!("FAIL ngr doctor");
        println!("cannot create log file: {e}");
        std::process::exit(1);
    }

    let links = &rc.links;
    println!("OK   ngr doctor");
    println!(
        "path: {}",
        config.map_or_else(
            || default_config_path().display().to_string(),
            |p| p.display().to_string()
        )
    );
    println!("profile: {}", rc.active_profile);
    println!("vault_root: {}", rc.vault_root.display());
    for folder in &rc.excluded_folders {
        println!("excluded: {}", folder.display());
    }
    println!("links.slugify_character: {:?}", links.slugify_character);
    println!("links.default_file_extension: {}", links.default_file_extension);
    println!("links.show_file_extension_in_preview: {}", links.show_file_extension_in_preview);
    println!("links.preview_label_styling: {:?}", links.preview_label_styling);
    println!("links.piped_wikilinks_syntax: {:?}", links.piped_wikilinks_syntax);
    println!("links.piped_wikilinks_separator: {}", links.piped_wikilinks_separator);

    let walked = VaultWalker::with_exclusions(&rc.vault_root, rc.excluded_folders.clone())
        .map(|w| w.with_extension(&links.default_file_extension))
        .and_then(|w| w.walk());
    match walked {
        Ok(files) => println!("notes: {}", files.len()),
        Err(e) => {
            tracing::warn!("Vault is not readable: {}", e);
            println!("notes: unavailable ({e})");
        }
    }
}
