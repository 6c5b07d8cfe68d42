//! Progress clamping and percentage math.
//!
//! Stored `current_slide` and `completed_slides` must satisfy
//! `0 <= current_slide < total_slides` and `0 <= completed_slides <=
//! total_slides` regardless of client input, so every write path clamps
//! through these functions before persisting.

/// Clamped slide position and completion count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedProgress {
    pub current_slide: i64,
    pub completed_slides: i64,
}

/// Clamp raw client-supplied values against the course's slide count.
///
/// `total_slides` is always >= 1 (see `content::total_slides`), so the
/// current-slide range `[0, total_slides - 1]` is never empty.
pub fn clamp_progress(
    current_slide: i64,
    completed_slides: i64,
    total_slides: usize,
) -> ClampedProgress {
    let total = total_slides.max(1) as i64;
    ClampedProgress {
        current_slide: current_slide.clamp(0, total - 1),
        completed_slides: completed_slides.clamp(0, total),
    }
}

/// Completion percentage, rounded to the nearest integer.
pub fn progress_percentage(completed_slides: i64, total_slides: usize) -> i64 {
    let total = total_slides.max(1) as i64;
    let completed = completed_slides.clamp(0, total);
    ((completed as f64 / total as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_input_clamps() {
        // 99/99 on a 3-slide course clamps to slide 2, 3 completed
        let clamped = clamp_progress(99, 99, 3);
        assert_eq!(clamped.current_slide, 2);
        assert_eq!(clamped.completed_slides, 3);
        assert_eq!(progress_percentage(clamped.completed_slides, 3), 100);
    }

    #[test]
    fn test_negative_input_clamps_to_zero() {
        let clamped = clamp_progress(-5, -1, 10);
        assert_eq!(clamped.current_slide, 0);
        assert_eq!(clamped.completed_slides, 0);
    }

    #[test]
    fn test_in_range_input_unchanged() {
        let clamped = clamp_progress(4, 5, 10);
        assert_eq!(clamped.current_slide, 4);
        assert_eq!(clamped.completed_slides, 5);
    }

    #[test]
    fn test_single_slide_course() {
        let clamped = clamp_progress(7, 7, 1);
        assert_eq!(clamped.current_slide, 0);
        assert_eq!(clamped.completed_slides, 1);
        assert_eq!(progress_percentage(1, 1), 100);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(0, 3), 0);
    }

    #[test]
    fn test_invariants_hold_for_any_sequence() {
        let total = 5;
        for (cur, done) in [(0, 0), (100, -3), (-100, 100), (3, 2), (4, 5)] {
            let c = clamp_progress(cur, done, total);
            assert!(c.current_slide >= 0 && c.current_slide < total as i64);
            assert!(c.completed_slides >= 0 && c.completed_slides <= total as i64);
        }
    }
}
