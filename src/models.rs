use jiff::{ToSpan, civil::Date};
use serde::{Deserialize, Serialize};

use crate::{entities::film, store::FilmRow};

pub const MAX_RATING: u8 = 5;
pub const MAX_TITLE_CHARS: usize = 160;

/// Ownership context stamped on new films. There is a single owner per
/// deployment, taken from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerId(pub i32);

impl Default for OwnerId {
    fn default() -> Self {
        Self(1)
    }
}

/// A film as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub title: String,
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<Date>,
    pub rating: u8,
    pub user: i32,
}

impl Film {
    pub fn draft(&self) -> FilmDraft {
        FilmDraft {
            title: self.title.clone(),
            favorite: self.favorite,
            watch_date: self.watch_date,
            rating: self.rating,
        }
    }
}

/// The editable part of a film: what clients send on create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDraft {
    pub title: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<Date>,
    #[serde(default)]
    pub rating: u8,
}

impl FilmDraft {
    /// Storage shape of the draft. An unset rating (0) is stored as NULL.
    pub fn into_row(self, owner: OwnerId) -> FilmRow {
        FilmRow {
            title: self.title,
            favorite: self.favorite,
            watchdate: self.watch_date.map(|d| d.to_string()),
            rating: (self.rating > 0).then_some(i32::from(self.rating)),
            user: owner.0,
        }
    }
}

impl From<film::Model> for Film {
    fn from(row: film::Model) -> Self {
        let watch_date = row.watchdate.as_deref().filter(|s| !s.is_empty()).and_then(|s| {
            match s.parse::<Date>() {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(
                        film_id = row.id,
                        value = %s,
                        error = %err,
                        "unreadable watch date"
                    );
                    None
                },
            }
        });

        Self {
            id: row.id,
            title: row.title,
            favorite: row.favorite,
            watch_date,
            rating: row.rating.map_or(0, |r| r.clamp(0, i32::from(MAX_RATING)) as u8),
            user: row.user,
        }
    }
}

/// Error payload shared by every failing response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FilmFilter {
    #[default]
    All,
    Favorites,
    Best,
    SeenLastMonth,
    Unseen,
}

impl FilmFilter {
    pub const ALL: [FilmFilter; 5] = [
        FilmFilter::All,
        FilmFilter::Favorites,
        FilmFilter::Best,
        FilmFilter::SeenLastMonth,
        FilmFilter::Unseen,
    ];

    /// Resolves a query-string filter name. Legacy `filter-*` names are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" | "filter-all" => Some(FilmFilter::All),
            "favorites" | "filter-favorite" => Some(FilmFilter::Favorites),
            "best" | "filter-best" => Some(FilmFilter::Best),
            "seen-last-month" | "filter-lastmonth" => Some(FilmFilter::SeenLastMonth),
            "unseen" | "filter-unseen" => Some(FilmFilter::Unseen),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilmFilter::All => "all",
            FilmFilter::Favorites => "favorites",
            FilmFilter::Best => "best",
            FilmFilter::SeenLastMonth => "seen-last-month",
            FilmFilter::Unseen => "unseen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilmFilter::All => "All",
            FilmFilter::Favorites => "Favorites",
            FilmFilter::Best => "Best Rated",
            FilmFilter::SeenLastMonth => "Seen Last Month",
            FilmFilter::Unseen => "Unseen",
        }
    }

    pub fn matches(self, film: &Film, today: Date) -> bool {
        match self {
            FilmFilter::All => true,
            FilmFilter::Favorites => film.favorite,
            FilmFilter::Best => film.rating >= MAX_RATING,
            FilmFilter::SeenLastMonth => seen_last_month(film, today),
            FilmFilter::Unseen => film.watch_date.is_none(),
        }
    }
}

/// True when the watch date lies in the month ending today: after the same
/// day one calendar month ago, and not in the future.
fn seen_last_month(film: &Film, today: Date) -> bool {
    let Some(watched) = film.watch_date else {
        return false;
    };
    let Ok(month_ago) = today.checked_sub(1.month()) else {
        return false;
    };
    watched > month_ago && watched <= today
}
