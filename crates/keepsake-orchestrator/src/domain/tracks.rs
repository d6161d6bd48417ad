//! The track catalogue and the picker stage.

use serde::{Deserialize, Serialize};

/// A playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Song title.
    pub title: String,
    /// Performer.
    pub artist: String,
    /// Audio source handed to the audio output.
    pub src: String,
    /// Cover art URL.
    pub cover: String,
    /// Length as shown in the picker.
    pub duration_label: String,
}

impl Track {
    fn new(title: &str, artist: &str, src: &str, cover: &str, duration_label: &str) -> Self {
        Self {
            title: title.to_owned(),
            artist: artist.to_owned(),
            src: src.to_owned(),
            cover: cover.to_owned(),
            duration_label: duration_label.to_owned(),
        }
    }
}

const COVER_BASE: &str = "https://res.cloudinary.com/dahvjvesd/image/upload";

/// The fixed five-track catalogue.
#[must_use]
pub fn catalogue() -> Vec<Track> {
    vec![
        Track::new(
            "Beautiful",
            "Bazzi feat. Camila Cabello",
            "/music/Bazzi feat. Camila Cabello - Beautiful [Official Music Video].mp3",
            &format!("{COVER_BASE}/v1770810906/beautiful_levas9.svg"),
            "3:00",
        ),
        Track::new(
            "JoyRide",
            "CORTIS (코르티스)",
            "/music/CORTIS (코르티스) 'JoyRide' Official MV.mp3",
            &format!("{COVER_BASE}/v1770810906/joyride_rm0ock.svg"),
            "2:50",
        ),
        Track::new(
            "Disillusioned",
            "Daniel Caesar",
            "/music/Daniel Caesar - Disillusioned (Official Audio).mp3",
            &format!("{COVER_BASE}/v1770810906/Disillusioned_m8mazk.svg"),
            "4:01",
        ),
        Track::new(
            "Soft",
            "LANY",
            "/music/LANY - Soft (Official Lyric Video).mp3",
            &format!("{COVER_BASE}/v1770810908/soft_wkyvmu.svg"),
            "2:58",
        ),
        Track::new(
            "Stuck",
            "LANY",
            "/music/LANY - Stuck (Official Lyric Video).mp3",
            &format!("{COVER_BASE}/v1770810907/stuck_l8nrf9.svg"),
            "3:03",
        ),
    ]
}

/// The music picker stage.
#[derive(Debug, Clone)]
pub struct TrackSelection {
    tracks: Vec<Track>,
    selected: Option<Track>,
}

impl TrackSelection {
    /// Creates a picker over the standard catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracks: catalogue(),
            selected: None,
        }
    }

    /// Tracks on offer.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Picks track `index`. Only the first valid pick counts.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if self.selected.is_some() {
            return None;
        }
        self.selected = Some(self.tracks.get(index)?.clone());
        self.selected.as_ref()
    }

    /// The picked track, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Track> {
        self.selected.as_ref()
    }
}

impl Default for TrackSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_five_tracks() {
        let titles: Vec<String> = catalogue().into_iter().map(|t| t.title).collect();

        assert_eq!(
            titles,
            vec!["Beautiful", "JoyRide", "Disillusioned", "Soft", "Stuck"]
        );
    }

    #[test]
    fn test_select_is_first_valid_pick_only() {
        let mut picker = TrackSelection::new();

        assert!(picker.select(9).is_none());
        assert_eq!(picker.select(3).map(|t| t.title.clone()), Some("Soft".into()));
        assert!(picker.select(0).is_none());
        assert_eq!(picker.selected().unwrap().artist, "LANY");
    }
}
