use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("listening history contains no plays")]
    EmptyDataset,
    #[error("play of `{found}` routed to the aggregate for `{expected}`")]
    IdentityMismatch { expected: String, found: String },
    #[error("average play time is undefined for `{song_id}`: no plays recorded")]
    DivisionUndefined { song_id: String },
    #[error("`{song_id}` has no recorded plays")]
    NoPlays { song_id: String },
    #[error("malformed play record #{index}: {reason}")]
    MalformedEvent { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_track() {
        let err = StatsError::IdentityMismatch {
            expected: String::from("spotify:track:a"),
            found: String::from("spotify:track:b"),
        };
        assert_eq!(
            err.to_string(),
            "play of `spotify:track:b` routed to the aggregate for `spotify:track:a`"
        );

        let err = StatsError::MalformedEvent {
            index: 3,
            reason: String::from("missing `ts`"),
        };
        assert_eq!(err.to_string(), "malformed play record #3: missing `ts`");
    }
}
