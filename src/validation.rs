use jiff::civil::Date;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{FilmDraft, MAX_RATING, MAX_TITLE_CHARS},
};

const INVALID: &str = "Invalid value";

/// Collects `location[param]: message` entries and turns them into a single
/// 422 error.
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn body(&mut self, param: &str) {
        self.0.push(format!("body[{param}]: {INVALID}"));
    }

    fn finish<T>(self, value: Option<T>) -> AppResult<T> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(AppError::Validation(self.0)),
        }
    }
}

/// Body of `POST /films` and `PUT /films/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmPayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub favorite: Option<bool>,
    pub watch_date: Option<String>,
    pub rating: Option<i64>,
}

impl FilmPayload {
    pub fn into_draft(self) -> AppResult<FilmDraft> {
        let mut violations = Violations::default();

        let title = self.title.filter(|t| (1..=MAX_TITLE_CHARS).contains(&t.chars().count()));
        if title.is_none() {
            violations.body("title");
        }

        let watch_date = match parse_watch_date(self.watch_date.as_deref()) {
            Ok(date) => date,
            Err(()) => {
                violations.body("watchDate");
                None
            },
        };

        let rating = match self.rating {
            None => Some(0),
            Some(r) => check_rating(r),
        };
        if rating.is_none() {
            violations.body("rating");
        }

        let draft = title.zip(rating).map(|(title, rating)| FilmDraft {
            title,
            favorite: self.favorite.unwrap_or(false),
            watch_date,
            rating,
        });
        violations.finish(draft)
    }
}

/// Body of `PUT /films/{id}/favorite`.
#[derive(Debug, Default, Deserialize)]
pub struct FavoritePayload {
    pub id: Option<i64>,
    pub favorite: Option<bool>,
}

impl FavoritePayload {
    pub fn favorite(&self) -> AppResult<bool> {
        let mut violations = Violations::default();
        if self.favorite.is_none() {
            violations.body("favorite");
        }
        violations.finish(self.favorite)
    }
}

/// Body of `PUT /films/{id}/rating`.
#[derive(Debug, Default, Deserialize)]
pub struct RatingPayload {
    pub id: Option<i64>,
    pub rating: Option<i64>,
}

impl RatingPayload {
    pub fn rating(&self) -> AppResult<u8> {
        let mut violations = Violations::default();
        let rating = self.rating.and_then(check_rating);
        if rating.is_none() {
            violations.body("rating");
        }
        violations.finish(rating)
    }
}

/// The id carried in a body must repeat the id in the URL.
pub fn ensure_same_id(path_id: i64, body_id: Option<i64>) -> AppResult<()> {
    if body_id == Some(path_id) {
        Ok(())
    } else {
        Err(AppError::validation("URL and body id mismatch"))
    }
}

pub fn ensure_positive_id(id: i64) -> AppResult<i64> {
    if id >= 1 { Ok(id) } else { Err(AppError::validation(format!("params[id]: {INVALID}"))) }
}

/// Ids outside the storage key range cannot name a stored film.
pub fn stored_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

fn check_rating(rating: i64) -> Option<u8> {
    u8::try_from(rating).ok().filter(|r| *r <= MAX_RATING)
}

/// Absent, null and empty dates mean "unseen". Anything else must be a
/// strict ten character `YYYY-MM-DD` calendar date.
fn parse_watch_date(raw: Option<&str>) -> Result<Option<Date>, ()> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(());
    }

    raw.parse::<Date>().map(Some).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn payload(title: &str) -> FilmPayload {
        FilmPayload {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let draft = payload("Matrix").into_draft().unwrap();
        assert_eq!(draft, FilmDraft {
            title: "Matrix".to_string(),
            favorite: false,
            watch_date: None,
            rating: 0,
        });
    }

    #[test]
    fn title_length_is_bounded() {
        assert!(payload("").into_draft().is_err());
        assert!(FilmPayload::default().into_draft().is_err());
        assert!(payload(&"x".repeat(160)).into_draft().is_ok());
        assert!(payload(&"x".repeat(161)).into_draft().is_err());
        // Counted in characters, not bytes.
        assert!(payload(&"é".repeat(160)).into_draft().is_ok());
    }

    #[test]
    fn watch_date_must_be_a_plain_calendar_date() {
        let with_date = |d: Option<&str>| FilmPayload {
            watch_date: d.map(str::to_string),
            ..payload("Matrix")
        };

        assert_eq!(with_date(None).into_draft().unwrap().watch_date, None);
        assert_eq!(with_date(Some("")).into_draft().unwrap().watch_date, None);
        assert_eq!(
            with_date(Some("2024-02-29")).into_draft().unwrap().watch_date,
            Some(date(2024, 2, 29))
        );

        let bad_dates =
            ["2023-02-29", "2024-13-01", "2024-1-01", "2024-01-01T10:00", "20240101", "yesterday"];
        for bad in bad_dates {
            assert!(with_date(Some(bad)).into_draft().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        for (rating, ok) in [(0, true), (5, true), (6, false), (-1, false), (7, false)] {
            let p = FilmPayload {
                rating: Some(rating),
                ..payload("Matrix")
            };
            assert_eq!(p.into_draft().is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn violations_are_joined() {
        let p = FilmPayload {
            title: Some(String::new()),
            rating: Some(9),
            ..Default::default()
        };
        let err = p.into_draft().unwrap_err();
        assert_eq!(err.to_string(), "body[title]: Invalid value, body[rating]: Invalid value");
    }

    #[test]
    fn partial_payloads() {
        let fav = FavoritePayload {
            id: Some(1),
            favorite: None,
        };
        assert_eq!(fav.favorite().unwrap_err().to_string(), "body[favorite]: Invalid value");

        let rating = RatingPayload {
            id: Some(1),
            rating: Some(7),
        };
        assert!(rating.rating().is_err());
        let rating = RatingPayload {
            id: Some(1),
            rating: Some(4),
        };
        assert_eq!(rating.rating().unwrap(), 4);
    }

    #[test]
    fn ids_must_agree() {
        assert!(ensure_same_id(3, Some(3)).is_ok());
        assert_eq!(
            ensure_same_id(3, Some(4)).unwrap_err().to_string(),
            "URL and body id mismatch"
        );
        assert!(ensure_same_id(3, None).is_err());
        assert!(ensure_positive_id(0).is_err());
        assert_eq!(ensure_positive_id(1).unwrap(), 1);
    }

    #[test]
    fn wide_ids_are_compared_before_narrowing() {
        let wide = i64::from(i32::MAX) + 1;
        assert!(ensure_same_id(wide, Some(wide)).is_ok());
        assert!(ensure_same_id(wide, Some(0)).is_err());
        assert_eq!(ensure_positive_id(wide).unwrap(), wide);
        assert_eq!(stored_id(wide), None);
        assert_eq!(stored_id(-wide), None);
        assert_eq!(stored_id(42), Some(42));
    }
}
