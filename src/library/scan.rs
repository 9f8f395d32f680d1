use std::path::Path;
use std::time::Duration;

use lofty::prelude::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::player::{MediaLocator, Mood, Track};

use super::display::display_label;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Parse a BPM tag; fractional values are rounded, junk is 0.
pub(super) fn parse_bpm(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Build a track for `path`, filling in whatever its tags provide.
pub(super) fn read_track(path: &Path) -> Track {
    let default_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let mut track = Track::new(path.to_string_lossy().into_owned(), default_title, "")
        .with_locator(MediaLocator::from(path.to_path_buf()))
        // Zero means unknown; the player substitutes its fallback length.
        .with_duration(Duration::ZERO);

    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("no tags for {}: {e}", path.display());
            return track;
        }
    };
    track.duration = tagged.properties().duration();

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return track;
    };
    if let Some(v) = non_empty(tag.get_string(&ItemKey::TrackTitle)) {
        track.title = v;
    }
    if let Some(v) = non_empty(tag.get_string(&ItemKey::TrackArtist)) {
        track.artist = v;
    }
    track.album = non_empty(tag.get_string(&ItemKey::AlbumTitle));
    if let Some(mood) = tag.get_string(&ItemKey::Mood).and_then(|v| v.parse::<Mood>().ok()) {
        track.mood = mood;
    }
    if let Some(bpm) = tag
        .get_string(&ItemKey::Bpm)
        .or_else(|| tag.get_string(&ItemKey::IntegerBpm))
    {
        track.tempo_bpm = parse_bpm(bpm);
    }
    track
}

/// Collect the audio files under `dir` as tracks, sorted by their listing
/// label. Each track's id and locator are its path.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut labelled: Vec<(String, Track)> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|entry| {
            let path = entry.path();
            path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
        })
        .map(|entry| {
            let track = read_track(entry.path());
            let label = display_label(&track, &settings.display_fields, &settings.display_separator);
            (label.to_lowercase(), track)
        })
        .collect();

    labelled.sort_by(|a, b| a.0.cmp(&b.0));
    log::info!("scanned {} tracks under {}", labelled.len(), dir.display());
    labelled.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    fn names(tracks: &[Track]) -> Vec<String> {
        tracks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));

        let settings = LibrarySettings {
            extensions: vec![".OPUS".into(), " ".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/a.opus"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    }

    #[test]
    fn parse_bpm_rounds_and_rejects_junk() {
        assert_eq!(parse_bpm("120"), 120);
        assert_eq!(parse_bpm(" 127.6 "), 128);
        assert_eq!(parse_bpm("fast"), 0);
        assert_eq!(parse_bpm("-5"), 0);
    }

    #[test]
    fn untagged_file_becomes_playable_track_keyed_by_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Night Drive.mp3");
        fs::write(&path, b"not a real mp3").unwrap();

        let t = read_track(&path);
        assert_eq!(t.id.as_str(), path.to_string_lossy());
        assert_eq!(t.title, "Night Drive");
        assert_eq!(t.artist, "");
        assert_eq!(t.locator.as_ref().and_then(|l| l.to_path()), Some(path.clone()));
        assert_eq!(t.duration, Duration::ZERO);
        assert_eq!(t.mood, Mood::Calm);
        assert_eq!(t.tempo_bpm, 0);
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_label_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let settings = LibrarySettings {
            display_fields: vec![TrackDisplayField::Title],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(names(&tracks), vec!["A", "b"]);
        assert!(tracks.iter().all(Track::has_audio));
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(names(&tracks), vec!["visible"]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(names(&tracks), vec!["root"]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let found = names(&scan(dir.path(), &settings));
        assert!(found.contains(&"root".to_string()));
        assert!(found.contains(&"one".to_string()));
        assert!(!found.contains(&"two".to_string()));
    }
}
