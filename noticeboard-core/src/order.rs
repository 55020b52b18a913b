/// Display-order allocator.
///
/// Notices can be pinned to one of 99 slots ("01".."99"). Slot "99" doubles
/// as the "unpinned" sentinel and may be shared; every other slot has at most
/// one holder. Asking for a slot that is already held evicts the holder to the
/// first free slot, and both changes are applied together.
use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Notice, Notification, SENTINEL_ORDER};

pub const MAX_ORDER: u8 = 99;

/// Zero-padded two-digit slot name.
pub fn format_order(slot: u8) -> String {
    format!("{:02}", slot)
}

/// First slot in 1..=99 not held by any notice, or the sentinel when all are taken.
pub fn next_available(notices: &[Notice]) -> String {
    (1..=MAX_ORDER)
        .map(format_order)
        .find(|order| !notices.iter().any(|n| n.order() == order))
        .unwrap_or_else(|| SENTINEL_ORDER.to_string())
}

/// A notice pushed out of its slot to make room for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eviction {
    pub notice_id: String,
    pub title: String,
    pub previous_order: String,
    pub new_order: String,
}

/// Outcome of granting a slot: the requester's order plus any eviction it causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAssignment {
    pub notice_id: String,
    pub order: String,
    pub eviction: Option<Eviction>,
}

impl OrderAssignment {
    /// Apply the whole assignment to a collection in one step.
    pub fn apply(&self, notices: &mut [Notice]) {
        for notice in notices.iter_mut() {
            if notice.id == self.notice_id {
                notice.display_order = Some(self.order.clone());
            } else if let Some(eviction) = &self.eviction {
                if notice.id == eviction.notice_id {
                    notice.display_order = Some(eviction.new_order.clone());
                }
            }
        }
    }

    pub fn notification(&self) -> Option<Notification> {
        self.eviction.as_ref().map(|e| {
            Notification::info(format!(
                "Notice \"{}\" moved to position {}",
                e.title, e.new_order
            ))
        })
    }
}

/// Plan granting `requested` to the notice `requester_id`.
///
/// The requester does not have to be in `notices` yet (a notice being added).
/// The sentinel never evicts. The evictee's new slot is computed over the
/// collection as it stands, so it can never equal `requested`.
pub fn plan_assignment(notices: &[Notice], requester_id: &str, requested: &str) -> OrderAssignment {
    let eviction = if requested == SENTINEL_ORDER {
        None
    } else {
        notices
            .iter()
            .find(|n| n.id != requester_id && n.display_order.as_deref() == Some(requested))
            .map(|holder| Eviction {
                notice_id: holder.id.clone(),
                title: holder.title.clone(),
                previous_order: requested.to_string(),
                new_order: next_available(notices),
            })
    };

    if let Some(e) = &eviction {
        log::info!(
            "[noticeboard.order] Slot {} taken by {}, moving it to {}",
            requested,
            e.notice_id,
            e.new_order
        );
    }

    OrderAssignment {
        notice_id: requester_id.to_string(),
        order: requested.to_string(),
        eviction,
    }
}

/// Display ordering: slot ascending, then newest first.
pub fn compare_for_display(a: &Notice, b: &Notice) -> Ordering {
    a.order()
        .cmp(b.order())
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

pub fn sort_for_display(notices: &mut [Notice]) {
    notices.sort_by(compare_for_display);
}

/// Non-sentinel slots held by more than one notice.
pub fn duplicate_orders(notices: &[Notice]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for notice in notices {
        if notice.order() != SENTINEL_ORDER {
            *counts.entry(notice.order()).or_default() += 1;
        }
    }
    let mut dups: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(order, _)| order.to_string())
        .collect();
    dups.sort();
    dups
}

/// Human label for a slot number: "First" .. "Twentieth", then "21th" style.
pub fn order_label(slot: u8) -> String {
    const NAMED: [&str; 20] = [
        "First",
        "Second",
        "Third",
        "Fourth",
        "Fifth",
        "Sixth",
        "Seventh",
        "Eighth",
        "Ninth",
        "Tenth",
        "Eleventh",
        "Twelfth",
        "Thirteenth",
        "Fourteenth",
        "Fifteenth",
        "Sixteenth",
        "Seventeenth",
        "Eighteenth",
        "Nineteenth",
        "Twentieth",
    ];
    match slot {
        1..=20 => NAMED[(slot - 1) as usize].to_string(),
        _ => format!("{}th", slot),
    }
}

/// One entry of the order picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOption {
    pub value: String,
    pub label: String,
    pub in_use: bool,
}

/// All 99 slots, flagged when held by a notice other than `editing_id`.
pub fn order_options(notices: &[Notice], editing_id: Option<&str>) -> Vec<OrderOption> {
    (1..=MAX_ORDER)
        .map(|slot| {
            let value = format_order(slot);
            let in_use = notices
                .iter()
                .filter(|n| Some(n.id.as_str()) != editing_id)
                .any(|n| n.order() == value);
            OrderOption {
                label: order_label(slot),
                value,
                in_use,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::notice;
    use chrono::Duration;

    fn pinned(id: &str, order: &str) -> Notice {
        let mut n = notice(id);
        n.display_order = Some(order.to_string());
        n
    }

    #[test]
    fn test_next_available_skips_taken_slots() {
        let notices = vec![pinned("a", "01"), pinned("b", "02"), pinned("c", "03")];
        assert_eq!(next_available(&notices), "04");
        assert_eq!(next_available(&[]), "01");
    }

    #[test]
    fn test_next_available_fills_gaps() {
        let notices = vec![pinned("a", "01"), pinned("b", "03")];
        assert_eq!(next_available(&notices), "02");
    }

    #[test]
    fn test_unset_order_counts_as_sentinel() {
        let notices: Vec<Notice> = (1..=98)
            .map(|i| pinned(&format!("n{}", i), &format_order(i)))
            .chain(std::iter::once(notice("unset")))
            .collect();
        // 99 is held by the unpinned notice, so everything is taken.
        assert_eq!(next_available(&notices), SENTINEL_ORDER);
    }

    #[test]
    fn test_full_board_returns_sentinel() {
        let notices: Vec<Notice> = (1..=99)
            .map(|i| pinned(&format!("n{}", i), &format_order(i)))
            .collect();
        assert_eq!(next_available(&notices), "99");
    }

    #[test]
    fn test_assignment_evicts_previous_holder() {
        let mut notices = vec![pinned("a", "01"), pinned("b", "02")];
        let plan = plan_assignment(&notices, "a", "02");

        let eviction = plan.eviction.clone().unwrap();
        assert_eq!(eviction.notice_id, "b");
        assert_eq!(eviction.new_order, "03");

        plan.apply(&mut notices);
        assert_eq!(notices[0].order(), "02");
        assert_eq!(notices[1].order(), "03");
        assert!(duplicate_orders(&notices).is_empty());

        let note = plan.notification().unwrap();
        assert_eq!(note.message, "Notice \"Notice b\" moved to position 03");
    }

    #[test]
    fn test_assignment_to_own_slot_is_noop() {
        let notices = vec![pinned("a", "01")];
        let plan = plan_assignment(&notices, "a", "01");
        assert!(plan.eviction.is_none());
        assert!(plan.notification().is_none());
    }

    #[test]
    fn test_sentinel_never_evicts() {
        let notices = vec![pinned("a", "99")];
        let plan = plan_assignment(&notices, "b", "99");
        assert!(plan.eviction.is_none());
    }

    #[test]
    fn test_new_notice_takes_held_slot() {
        let mut notices = vec![pinned("a", "01")];
        let plan = plan_assignment(&notices, "new", "01");
        assert_eq!(plan.eviction.as_ref().unwrap().new_order, "02");
        plan.apply(&mut notices);
        assert_eq!(notices[0].order(), "02");
    }

    #[test]
    fn test_display_sort() {
        let mut old = notice("old");
        old.timestamp -= Duration::hours(1);
        let new = notice("new");
        let mut notices = vec![old, pinned("p2", "02"), new, pinned("p1", "01")];
        sort_for_display(&mut notices);
        let ids: Vec<&str> = notices.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "new", "old"]);
    }

    #[test]
    fn test_duplicate_orders_ignores_sentinel() {
        let notices = vec![
            pinned("a", "05"),
            pinned("b", "05"),
            notice("c"),
            notice("d"),
        ];
        assert_eq!(duplicate_orders(&notices), vec!["05"]);
    }

    #[test]
    fn test_order_labels_and_options() {
        assert_eq!(order_label(1), "First");
        assert_eq!(order_label(20), "Twentieth");
        assert_eq!(order_label(21), "21th");

        let notices = vec![pinned("a", "01"), pinned("b", "02")];
        let options = order_options(&notices, Some("a"));
        assert_eq!(options.len(), 99);
        assert!(!options[0].in_use);
        assert!(options[1].in_use);
        assert_eq!(options[1].value, "02");
    }
}
