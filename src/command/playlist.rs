//! Playlist query construction for `PlayPlaylist` requests
//!
//! Sparse, possibly overlapping slots (playlist, genre, artist, album, title)
//! become exactly one server query plus a confirmation sentence. The query
//! and the sentence are chosen by separate priority orders.

use crate::core::text::{non_blank, start_case};
use crate::intent::Intent;
use crate::server::MethodCall;

/// Placeholder the server accepts for "any" in a `loadalbum` filter
pub const WILDCARD: &str = "*";

/// Spoken when the request named nothing playable
pub const NOT_FOUND_TEXT: &str = "You request was not found in the library. Please try again";

/// Spoken when the server rejected the query
pub const APOLOGY_TEXT: &str = "Whoops, something went wrong.";

/// The five optional slots of a `PlayPlaylist` request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSlots {
    pub playlist: Option<String>,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl PlaylistSlots {
    /// Read the slots from an intent; the playlist name is start-cased
    pub fn from_intent(intent: &Intent) -> Self {
        Self {
            playlist: intent
                .slot("Playlist")
                .map(|p| start_case(&p))
                .filter(|p| !p.is_empty()),
            genre: intent.slot("Genre"),
            artist: intent.slot("Artist"),
            album: intent.slot("Album"),
            title: intent.slot("Title"),
        }
    }

    /// Same slots with blank values dropped and the rest trimmed
    fn normalized(&self) -> Self {
        Self {
            playlist: non_blank(self.playlist.as_deref()),
            genre: non_blank(self.genre.as_deref()),
            artist: non_blank(self.artist.as_deref()),
            album: non_blank(self.album.as_deref()),
            title: non_blank(self.title.as_deref()),
        }
    }
}

/// The one query issued for a `PlayPlaylist` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistQuery {
    /// Load every track whose title matches
    TitleSearch { title: String },
    /// Play a saved playlist by name
    NamedPlaylist { name: String },
    /// Load library tracks filtered by genre, artist and album; absent
    /// filters hold [`WILDCARD`]
    FilteredLibrary {
        genre: String,
        artist: String,
        album: String,
    },
}

impl PlaylistQuery {
    /// The server command for this query
    pub fn method_call(&self) -> MethodCall {
        match self {
            Self::TitleSearch { title } => {
                let search = format!("track.titlesearch={}", title);
                MethodCall::new("playlist", &["loadtracks", search.as_str()])
            }
            Self::NamedPlaylist { name } => MethodCall::new("playlist", &["play", name.as_str()]),
            Self::FilteredLibrary {
                genre,
                artist,
                album,
            } => MethodCall::new(
                "playlist",
                &["loadalbum", genre.as_str(), artist.as_str(), album.as_str()],
            ),
        }
    }
}

/// Pick the query for `slots`: title, then playlist, then library filters
///
/// With every slot absent this is a fully wildcarded library query.
pub fn select_query(slots: &PlaylistSlots) -> PlaylistQuery {
    let slots = slots.normalized();

    if let Some(title) = slots.title {
        return PlaylistQuery::TitleSearch { title };
    }

    if let Some(name) = slots.playlist {
        return PlaylistQuery::NamedPlaylist { name };
    }

    let or_wildcard = |value: Option<String>| value.unwrap_or_else(|| WILDCARD.to_string());
    PlaylistQuery::FilteredLibrary {
        genre: or_wildcard(slots.genre),
        artist: or_wildcard(slots.artist),
        album: or_wildcard(slots.album),
    }
}

/// Confirmation sentence for `slots`, empty when nothing playable was named
pub fn confirmation_text(slots: &PlaylistSlots) -> String {
    let slots = slots.normalized();

    if let Some(playlist) = &slots.playlist {
        return format!("Playing {} playlist.", playlist);
    }

    match (&slots.genre, &slots.title, &slots.album, &slots.artist) {
        (None, None, None, None) => String::new(),
        (Some(genre), _, _, _) => format!("Playing songs in the {} genre", genre),
        (None, Some(title), _, _) => format!("Playing songs with the title {}", title),
        (None, None, Some(album), Some(artist)) => format!("Playing {} by {}", album, artist),
        (None, None, Some(album), None) => format!("Playing {}", album),
        (None, None, None, Some(artist)) => format!("Playing {}", artist),
    }
}

/// Build the query and its confirmation in one step
pub fn build_query(slots: &PlaylistSlots) -> (PlaylistQuery, String) {
    (select_query(slots), confirmation_text(slots))
}

/// Final spoken text once the server has answered
pub fn reply_text(acknowledged: bool, confirmation: &str) -> String {
    if !acknowledged {
        APOLOGY_TEXT.to_string()
    } else if confirmation.is_empty() {
        NOT_FOUND_TEXT.to_string()
    } else {
        confirmation.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn slots() -> PlaylistSlots {
        PlaylistSlots::default()
    }

    #[test]
    fn test_title_search() {
        let (query, text) = build_query(&PlaylistSlots {
            title: Some("Yesterday".into()),
            ..slots()
        });

        assert_eq!(
            query,
            PlaylistQuery::TitleSearch {
                title: "Yesterday".into()
            }
        );
        assert_eq!(text, "Playing songs with the title Yesterday");
        assert_eq!(
            query.method_call(),
            MethodCall::new("playlist", &["loadtracks", "track.titlesearch=Yesterday"])
        );
    }

    #[test]
    fn test_named_playlist() {
        let (query, text) = build_query(&PlaylistSlots {
            playlist: Some("Road Trip".into()),
            ..slots()
        });

        assert_eq!(
            query,
            PlaylistQuery::NamedPlaylist {
                name: "Road Trip".into()
            }
        );
        assert_eq!(text, "Playing Road Trip playlist.");
        assert_eq!(
            query.method_call(),
            MethodCall::new("playlist", &["play", "Road Trip"])
        );
    }

    #[test]
    fn test_filtered_library() {
        let (query, text) = build_query(&PlaylistSlots {
            genre: Some("Jazz".into()),
            artist: Some("Miles Davis".into()),
            ..slots()
        });

        assert_eq!(
            query,
            PlaylistQuery::FilteredLibrary {
                genre: "Jazz".into(),
                artist: "Miles Davis".into(),
                album: "*".into(),
            }
        );
        assert_eq!(text, "Playing songs in the Jazz genre");
        assert_eq!(
            query.method_call(),
            MethodCall::new("playlist", &["loadalbum", "Jazz", "Miles Davis", "*"])
        );
    }

    #[test]
    fn test_all_slots_absent_plays_everything() {
        let (query, text) = build_query(&slots());

        assert_eq!(
            query,
            PlaylistQuery::FilteredLibrary {
                genre: "*".into(),
                artist: "*".into(),
                album: "*".into(),
            }
        );
        assert!(text.is_empty());
        assert_eq!(reply_text(true, &text), NOT_FOUND_TEXT);
    }

    #[test]
    fn test_blank_slots_are_absent() {
        let (query, text) = build_query(&PlaylistSlots {
            title: Some("   ".into()),
            playlist: Some("".into()),
            artist: Some(" Nina Simone ".into()),
            ..slots()
        });

        assert_eq!(
            query,
            PlaylistQuery::FilteredLibrary {
                genre: "*".into(),
                artist: "Nina Simone".into(),
                album: "*".into(),
            }
        );
        assert_eq!(text, "Playing Nina Simone");
    }

    #[test]
    fn test_title_query_wins_but_playlist_text_wins() {
        let (query, text) = build_query(&PlaylistSlots {
            playlist: Some("Road Trip".into()),
            title: Some("Yesterday".into()),
            ..slots()
        });

        assert!(matches!(query, PlaylistQuery::TitleSearch { .. }));
        assert_eq!(text, "Playing Road Trip playlist.");
    }

    #[test]
    fn test_album_and_artist_text() {
        let text = confirmation_text(&PlaylistSlots {
            album: Some("Kind of Blue".into()),
            artist: Some("Miles Davis".into()),
            ..slots()
        });
        assert_eq!(text, "Playing Kind of Blue by Miles Davis");

        let text = confirmation_text(&PlaylistSlots {
            album: Some("Kind of Blue".into()),
            ..slots()
        });
        assert_eq!(text, "Playing Kind of Blue");
    }

    #[test]
    fn test_genre_text_beats_title_and_album() {
        let text = confirmation_text(&PlaylistSlots {
            genre: Some("Jazz".into()),
            title: Some("So What".into()),
            album: Some("Kind of Blue".into()),
            ..slots()
        });
        assert_eq!(text, "Playing songs in the Jazz genre");
    }

    #[test]
    fn test_reply_text_apology_ignores_query_shape() {
        assert_eq!(reply_text(false, "Playing Road Trip playlist."), APOLOGY_TEXT);
        assert_eq!(reply_text(false, ""), APOLOGY_TEXT);
        assert_eq!(reply_text(true, "Playing Jazz"), "Playing Jazz");
    }

    #[test]
    fn test_from_intent_start_cases_playlist() {
        let intent = Intent::new("PlayPlaylist")
            .with_slot("playlist", "road trip")
            .with_slot("ARTIST", "miles davis");

        let slots = PlaylistSlots::from_intent(&intent);
        assert_eq!(slots.playlist.as_deref(), Some("Road Trip"));
        assert_eq!(slots.artist.as_deref(), Some("miles davis"));
        assert_eq!(slots.title, None);
    }

    fn slot_value() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[ a-zA-Z]{0,8}")
    }

    proptest! {
        #[test]
        fn prop_builder_is_idempotent(
            playlist in slot_value(),
            genre in slot_value(),
            artist in slot_value(),
            album in slot_value(),
            title in slot_value(),
        ) {
            let slots = PlaylistSlots { playlist, genre, artist, album, title };
            prop_assert_eq!(build_query(&slots), build_query(&slots));
        }

        #[test]
        fn prop_title_always_selects_title_search(
            title in "[a-zA-Z]{1,8}",
            playlist in slot_value(),
            genre in slot_value(),
        ) {
            let slots = PlaylistSlots {
                title: Some(title.clone()),
                playlist,
                genre,
                ..PlaylistSlots::default()
            };
            prop_assert_eq!(select_query(&slots), PlaylistQuery::TitleSearch { title });
        }
    }
}
