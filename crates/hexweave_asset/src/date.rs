//! Date strings as sortable numbers
//!
//! `yyyy`, `mm/yyyy` and `dd/mm/yyyy` map to `year + month·0.01 + day·0.0001`.
//! The literal `present` sorts after every date.

use crate::AssetError;
use hexweave_core::post::{PostData, PostDate};

const PRESENT: &str = "present";

/// Parse one date string. `None` when it is malformed.
fn parse_date(date: &str) -> Option<f64> {
    let date = date.trim();
    if date.eq_ignore_ascii_case(PRESENT) {
        return Some(f64::MAX);
    }

    let parts = date
        .split('/')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let (day, month, year) = match parts.as_slice() {
        [year] => (0, 0, *year),
        [month, year] => (0, *month, *year),
        [day, month, year] => (*day, *month, *year),
        _ => return None,
    };
    if month > 12 || day > 31 {
        return None;
    }
    Some(year as f64 + month as f64 * 0.01 + day as f64 * 0.0001)
}

/// Sort key for `post`. A range sorts by its end, falling back to its start.
pub fn date_to_number(post: &PostData) -> Result<f64, AssetError> {
    let date = match &post.date {
        PostDate::Single(date) => Some(date.as_str()),
        PostDate::Range { start, end } => end.as_deref().or(start.as_deref()),
    };
    let invalid = || AssetError::InvalidDate {
        post: post.id.clone(),
        date: date.unwrap_or_default().to_string(),
    };
    date.and_then(parse_date).ok_or_else(invalid)
}

/// Most recent first. Fails on the first unparseable date.
pub fn sort_by_date_descending(posts: &mut Vec<PostData>) -> Result<(), AssetError> {
    let mut keyed = posts
        .drain(..)
        .map(|post| date_to_number(&post).map(|key| (key, post)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    posts.extend(keyed.into_iter().map(|(_, post)| post));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, date: PostDate) -> PostData {
        PostData {
            id: id.into(),
            date,
            ..Default::default()
        }
    }

    fn single(date: &str) -> PostDate {
        PostDate::Single(date.into())
    }

    #[test]
    fn weighted_decimal_concatenation() {
        assert_eq!(date_to_number(&post("a", single("2019"))).unwrap(), 2019.0);
        assert_eq!(date_to_number(&post("a", single("03/2020"))).unwrap(), 2020.0 + 0.03);
        let full = date_to_number(&post("a", single("15/03/2020"))).unwrap();
        assert!((full - 2020.0315).abs() < 1e-9);
    }

    #[test]
    fn present_is_the_maximum() {
        let present = post(
            "now",
            PostDate::Range {
                start: None,
                end: Some("present".into()),
            },
        );
        let value = date_to_number(&present).unwrap();
        assert!(value >= date_to_number(&post("far", single("31/12/9999"))).unwrap());
    }

    #[test]
    fn range_falls_back_to_start() {
        let range = post(
            "a",
            PostDate::Range {
                start: Some("06/2011".into()),
                end: None,
            },
        );
        assert!((date_to_number(&range).unwrap() - 2011.06).abs() < 1e-9);
    }

    #[test]
    fn malformed_dates_fail_fast() {
        for date in ["", "June 2020", "1/2/3/4", "13/2020"] {
            let err = date_to_number(&post("bad", single(date))).unwrap_err();
            assert!(matches!(err, AssetError::InvalidDate { post: ref id, .. } if id == "bad"), "{date}");
        }
        let empty_range = post("bad", PostDate::Range { start: None, end: None });
        assert!(date_to_number(&empty_range).is_err());
    }

    #[test]
    fn sorts_most_recent_first() {
        let mut posts = vec![
            post("old", single("2012")),
            post(
                "ongoing",
                PostDate::Range {
                    start: Some("2015".into()),
                    end: Some("present".into()),
                },
            ),
            post("mid", single("04/2016")),
        ];
        sort_by_date_descending(&mut posts).unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["ongoing", "mid", "old"]);
    }
}
