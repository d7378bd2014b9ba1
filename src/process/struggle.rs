//! Struggle points and productive time-of-day periods

use crate::process::types::{
    AnalyzedSession, ProductivePeriod, SessionTag, StrugglePoint, StruggleType, TimeOfDay,
};
use chrono::Timelike;

/// One struggle point per struggling or stagnant session. A point is resolved
/// exactly when the next session is tagged productive.
pub fn detect_struggle_points(sessions: &[AnalyzedSession], tags: &[SessionTag]) -> Vec<StrugglePoint> {
    sessions
        .iter()
        .zip(tags)
        .enumerate()
        .filter(|(_, (_, tag))| tag.is_struggle())
        .map(|(i, (session, tag))| StrugglePoint {
            session_id: session.session_id.clone(),
            timestamp: session.started_at,
            struggle_type: match tag {
                SessionTag::Stagnant => StruggleType::Stagnation,
                _ => StruggleType::HighLoad,
            },
            duration_minutes: session.duration_minutes,
            resolved: tags.get(i + 1) == Some(&SessionTag::Productive),
        })
        .collect()
}

/// Words per minute by time-of-day bucket, most productive first
pub fn productive_periods(sessions: &[AnalyzedSession]) -> Vec<ProductivePeriod> {
    let mut periods: Vec<ProductivePeriod> = Vec::new();

    for session in sessions {
        let bucket = TimeOfDay::from_hour(session.started_at.hour());
        let period = match periods.iter().position(|p| p.time_of_day == bucket) {
            Some(i) => &mut periods[i],
            None => {
                periods.push(ProductivePeriod {
                    time_of_day: bucket,
                    sessions: 0,
                    total_words: 0,
                    total_minutes: 0.0,
                    words_per_minute: 0.0,
                });
                let last = periods.len() - 1;
                &mut periods[last]
            }
        };
        period.sessions += 1;
        period.total_words += u64::from(session.words_added);
        period.total_minutes += session.duration_minutes;
    }

    for period in &mut periods {
        period.words_per_minute = if period.total_minutes > 0.0 {
            period.total_words as f64 / period.total_minutes
        } else {
            0.0
        };
    }

    periods.sort_by(|a, b| b.words_per_minute.total_cmp(&a.words_per_minute));
    periods
}
