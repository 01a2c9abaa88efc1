//! Context window selection.

/// Number of messages sent to a provider when nothing else is configured.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Return the last `limit` items of a chronologically ordered history.
///
/// Histories no longer than `limit` come back whole. Order is preserved;
/// there is no summarization or weighting by role.
pub fn build_window<T>(messages: &[T], limit: usize) -> &[T] {
    let start = messages.len().saturating_sub(limit);
    &messages[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_is_returned_whole() {
        for len in 0..=DEFAULT_CONTEXT_WINDOW {
            let history: Vec<usize> = (0..len).collect();
            assert_eq!(build_window(&history, DEFAULT_CONTEXT_WINDOW), history.as_slice());
        }
    }

    #[test]
    fn test_long_history_keeps_last_n_in_order() {
        for len in (DEFAULT_CONTEXT_WINDOW + 1)..40 {
            let history: Vec<usize> = (0..len).collect();
            let window = build_window(&history, DEFAULT_CONTEXT_WINDOW);
            assert_eq!(window.len(), DEFAULT_CONTEXT_WINDOW);
            assert_eq!(window, &history[len - DEFAULT_CONTEXT_WINDOW..]);
            assert!(window.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_twelve_messages_drop_two_oldest() {
        let history: Vec<usize> = (1..=12).collect();
        let window = build_window(&history, 10);
        assert_eq!(window.first(), Some(&3));
        assert_eq!(window.last(), Some(&12));
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let history = vec!["a", "b"];
        assert!(build_window(&history, 0).is_empty());
    }
}
