//! Playlist listing command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::convert::{Catalog, PlaylistSummary};
use crate::error::ResultExt;

use super::{TokenArgs, client_for};

/// List the authenticated user's playlists on `catalog`
pub fn cmd_playlists(
    rt: &Runtime,
    config: &Config,
    catalog: Catalog,
    tokens: &TokenArgs,
    json: bool,
) -> anyhow::Result<()> {
    let token = tokens.for_catalog(catalog)?;
    let client = client_for(config, catalog);

    let playlists = rt
        .block_on(client.list_playlists(&token))
        .with_context(format!("listing {} playlists", catalog))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&playlists)?);
        return Ok(());
    }

    if playlists.is_empty() {
        println!("No {} playlists found.", catalog);
        return Ok(());
    }

    println!("{} playlists ({}):", catalog, playlists.len());
    for playlist in &playlists {
        println!("  {}", format_row(playlist));
    }
    Ok(())
}

fn format_row(playlist: &PlaylistSummary) -> String {
    let count = playlist
        .track_count
        .map(|n| format!("{} items", n))
        .unwrap_or_else(|| "? items".to_string());
    format!("{:<40} {:>10}  {}", playlist.name, count, playlist.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row() {
        let row = format_row(&PlaylistSummary {
            id: "PL1".to_string(),
            name: "Favorites".to_string(),
            track_count: Some(12),
        });
        assert!(row.starts_with("Favorites"));
        assert!(row.contains("12 items"));
        assert!(row.ends_with("PL1"));

        let unknown = format_row(&PlaylistSummary {
            id: "p".to_string(),
            name: "Mix".to_string(),
            track_count: None,
        });
        assert!(unknown.contains("? items"));
    }
}
