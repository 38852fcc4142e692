use notemark_babel::common::masking::{mask_spans, Protected, Span};
use proptest::prelude::*;

proptest! {
    #[test]
    fn disjoint_candidates_are_untouched(
        start in 0usize..1000,
        len in 0usize..100,
        gap in 1usize..100,
        region_len in 0usize..100,
    ) {
        let end = start + len;
        let after = Protected::closed(end + gap, end + gap + region_len);
        let mut spans = vec![Span::new(start, end)];
        mask_spans(&mut spans, &[after]);
        prop_assert_eq!(spans[0], Span::new(start, end));

        if start >= gap + region_len {
            let before = Protected::closed(start - gap - region_len, start - gap);
            mask_spans(&mut spans, &[before]);
            prop_assert_eq!(spans[0], Span::new(start, end));
        }
    }

    #[test]
    fn contained_candidates_lose_both_bounds(
        region_start in 0usize..1000,
        offset in 0usize..50,
        len in 0usize..50,
        slack in 0usize..50,
    ) {
        let start = region_start + offset;
        let end = start + len;
        let region = Protected::closed(region_start, end + slack);
        let mut spans = vec![Span::new(start, end)];
        mask_spans(&mut spans, &[region]);
        prop_assert_eq!(spans[0], Span { start: None, end: None });
    }

    #[test]
    fn open_region_never_masks_what_comes_before(
        start in 0usize..1000,
        len in 0usize..100,
        gap in 1usize..100,
    ) {
        let end = start + len;
        let mut spans = vec![Span::new(start, end)];
        mask_spans(&mut spans, &[Protected::open(end + gap)]);
        prop_assert!(spans[0].is_intact());
    }
}
