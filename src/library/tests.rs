use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::config::{LibrarySettings, TrackDisplayField};
use crate::player::{MediaLocator, Track};

fn song() -> Track {
    Track::new("/music/Song.mp3", "Song", "Artist")
        .with_album("Record")
        .with_locator(MediaLocator::new("/music/Song.mp3"))
}

#[test]
fn display_label_can_format_artist_title() {
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(display_label(&song(), &fields, " - "), "Artist - Song");

    let padded = Track::new("x", "Song", "  Artist  ");
    assert_eq!(display_label(&padded, &fields, " - "), "Artist - Song");

    let anonymous = Track::new("x", "Song", "");
    assert_eq!(display_label(&anonymous, &fields, " - "), "Song");
}

#[test]
fn display_label_uses_album_filename_and_path() {
    let t = song();
    assert_eq!(
        display_label(&t, &[TrackDisplayField::Album, TrackDisplayField::Filename], " / "),
        "Record / Song"
    );
    assert_eq!(display_label(&t, &[TrackDisplayField::Path], ""), "/music/Song.mp3");
    assert_eq!(display_label(&t, &[TrackDisplayField::Display], " | "), "Artist | Song");
}

#[test]
fn display_label_falls_back_to_title() {
    let t = Track::new("x", "Only Title", "");
    assert_eq!(display_label(&t, &[TrackDisplayField::Album], " - "), "Only Title");
    assert_eq!(display_label(&t, &[], " - "), "Only Title");
}

#[test]
fn fuzzy_match_is_case_insensitive_subsequence() {
    assert_eq!(fuzzy_match_positions("Night Drive", "ndr"), Some(vec![0, 6, 7]));
    assert_eq!(fuzzy_match_positions("Night Drive", "NIGHT"), Some(vec![0, 1, 2, 3, 4]));
    assert_eq!(fuzzy_match_positions("Night Drive", "drn"), None);
    assert_eq!(fuzzy_match_positions("anything", ""), Some(vec![]));
}

#[test]
fn search_matches_artist_and_title_in_catalog_order() {
    let tracks = vec![
        Track::new("1", "Blue Monday", "New Order"),
        Track::new("2", "Strobe", "deadmau5"),
        Track::new("3", "Blue in Green", "Miles Davis"),
    ];
    assert_eq!(search(&tracks, "blue"), vec![0, 2]);
    assert_eq!(search(&tracks, "dm5"), vec![1]);
    assert_eq!(search(&tracks, "miles green"), vec![2]);
    assert_eq!(search(&tracks, "zzz"), Vec::<usize>::new());
    assert_eq!(search(&tracks, "  "), vec![0, 1, 2]);
}

#[test]
fn scan_keys_visible_audio_files_by_path() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("a.mp3");
    fs::write(&song, b"not a real mp3").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("notes.txt"), b"liner notes").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);

    assert_eq!(tracks.len(), 1);
    let t = &tracks[0];
    assert_eq!(t.id.as_str(), song.to_string_lossy());
    assert_eq!(t.locator.as_ref().and_then(|l| l.to_path()), Some(song.clone()));
    assert_eq!(t.locator.as_ref().map(|l| l.to_string()), Some(t.id.to_string()));
    assert_eq!(t.title, "a");
    assert_eq!(t.duration, Duration::ZERO);
}
