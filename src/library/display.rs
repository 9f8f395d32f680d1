use std::path::PathBuf;

use crate::config::TrackDisplayField;
use crate::player::Track;

/// Build a listing label for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, path) in the
/// configured order and falls back to `title` when no parts were produced.
pub fn display_label(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let path: Option<PathBuf> = track.locator.as_ref().and_then(|l| l.to_path());
    let artist = Some(track.artist.trim()).filter(|s| !s.is_empty());
    let album = track.album.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let title = track.title.trim();

    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" on its own means "artist - title".
                if let Some(a) = artist {
                    parts.push(a.to_string());
                }
                if !title.is_empty() {
                    parts.push(title.to_string());
                }
            }
            TrackDisplayField::Title => {
                if !title.is_empty() {
                    parts.push(title.to_string());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = artist {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = album {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = path.as_deref().and_then(|p| p.file_stem()).and_then(|s| s.to_str())
                {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                if let Some(p) = &path {
                    parts.push(p.display().to_string());
                }
            }
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
