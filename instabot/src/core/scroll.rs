//! Stable-height scroll collection
//!
//! Infinite-scroll surfaces load more content when scrolled to the bottom.
//! Collection keeps scrolling until the surface height stops growing or a
//! step budget runs out.

use crate::error::InstabotResult;
use crate::traits::{SocialSite, Surface};

/// Scroll `surface` repeatedly, harvesting items after each step.
///
/// Each step scrolls to the bottom (the site settles), harvests what is
/// rendered, then re-reads the height; an unchanged height ends the loop.
/// `max_steps` of `None` scrolls until the height is stable. Items are
/// returned in harvest order and may contain repeats.
pub fn collect_until_stable<S, T, F>(
    site: &mut S,
    surface: Surface,
    max_steps: Option<usize>,
    mut harvest: F,
) -> InstabotResult<Vec<T>>
where
    S: SocialSite + ?Sized,
    F: FnMut(&mut S) -> InstabotResult<Vec<T>>,
{
    let mut last_height = site.content_height(surface)?;
    let mut items = Vec::new();
    let mut steps = 0;

    while max_steps.map_or(true, |max| steps < max) {
        site.scroll_to_bottom(surface)?;
        items.extend(harvest(site)?);
        steps += 1;

        let new_height = site.content_height(surface)?;
        if new_height == last_height {
            break;
        }
        last_height = new_height;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockSocialSite;

    fn growing_site() -> MockSocialSite {
        let mut site = MockSocialSite::new();
        let mut height = 0;
        site.expect_content_height().returning(move |_| {
            height += 100;
            Ok(height)
        });
        site
    }

    #[test]
    fn test_stops_when_height_is_stable() {
        let mut site = MockSocialSite::new();
        let mut heights = vec![100, 200, 300, 300].into_iter();
        site.expect_content_height()
            .times(4)
            .returning(move |_| Ok(heights.next().unwrap_or(300)));
        site.expect_scroll_to_bottom().times(3).returning(|_| Ok(()));

        let mut step = 0;
        let items = collect_until_stable(&mut site, Surface::FollowersDialog, None, |_| {
            step += 1;
            Ok(vec![step])
        })
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_respects_step_budget() {
        let mut site = growing_site();
        site.expect_scroll_to_bottom()
            .withf(|surface| *surface == Surface::TagFeed)
            .times(6)
            .returning(|_| Ok(()));

        let items = collect_until_stable(&mut site, Surface::TagFeed, Some(6), |_| Ok(vec!["post"])).unwrap();
        assert_eq!(items.len(), 6);
    }

    #[test]
    fn test_zero_budget_never_scrolls() {
        let mut site = growing_site();
        site.expect_scroll_to_bottom().never();

        let items: Vec<u8> = collect_until_stable(&mut site, Surface::TagFeed, Some(0), |_| Ok(vec![1])).unwrap();
        assert!(items.is_empty());
    }
}
