//! Group-by over categorical columns.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{CampaignRecord, CategoryColumn, Dataset, NumericColumn};
use crate::math::mean;

/// Ordering of groups in a group-by result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Keys sorted lexicographically (console tables).
    Sorted,
    /// Keys in order of first appearance in the dataset (chart categories).
    FirstSeen,
}

/// Records sharing one value of a categorical column.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: String,
    pub records: Vec<&'a CampaignRecord>,
}

impl Group<'_> {
    pub fn values(&self, column: NumericColumn) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |r| r.value(column))
    }

    pub fn mean(&self, column: NumericColumn) -> f64 {
        mean(self.values(column))
    }
}

/// Group records by `key`. Records with a missing key are left out.
pub fn group_by(dataset: &Dataset, key: CategoryColumn, order: GroupOrder) -> Vec<Group<'_>> {
    match order {
        GroupOrder::Sorted => {
            let mut groups: BTreeMap<&str, Vec<&CampaignRecord>> = BTreeMap::new();
            for record in &dataset.records {
                if let Some(k) = record.category(key) {
                    groups.entry(k).or_default().push(record);
                }
            }
            groups
                .into_iter()
                .map(|(k, records)| Group {
                    key: k.to_string(),
                    records,
                })
                .collect()
        }
        GroupOrder::FirstSeen => {
            let mut index: HashMap<&str, usize> = HashMap::new();
            let mut groups: Vec<Group<'_>> = Vec::new();
            for record in &dataset.records {
                let Some(k) = record.category(key) else { continue };
                let slot = *index.entry(k).or_insert_with(|| {
                    groups.push(Group {
                        key: k.to_string(),
                        records: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].records.push(record);
            }
            groups
        }
    }
}

/// Mean of `value` per distinct `key`.
pub fn group_mean(
    dataset: &Dataset,
    key: CategoryColumn,
    value: NumericColumn,
    order: GroupOrder,
) -> Vec<(String, f64)> {
    group_by(dataset, key, order)
        .into_iter()
        .map(|g| {
            let m = g.mean(value);
            (g.key, m)
        })
        .collect()
}

/// Distinct values of `key`, in the requested order.
pub fn distinct(dataset: &Dataset, key: CategoryColumn, order: GroupOrder) -> Vec<String> {
    group_by(dataset, key, order).into_iter().map(|g| g.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(platforms: &[Option<&str>]) -> Dataset {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = platforms
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut r = CampaignRecord::empty(date);
                r.platform = p.map(str::to_string);
                r.roas = Some(i as f64);
                r
            })
            .collect();
        Dataset::new("test.csv", records)
    }

    #[test]
    fn sorted_and_first_seen_orders_differ() {
        let ds = dataset(&[Some("TikTok"), Some("Meta"), Some("TikTok"), Some("Google")]);

        assert_eq!(
            distinct(&ds, CategoryColumn::Platform, GroupOrder::Sorted),
            ["Google", "Meta", "TikTok"]
        );
        assert_eq!(
            distinct(&ds, CategoryColumn::Platform, GroupOrder::FirstSeen),
            ["TikTok", "Meta", "Google"]
        );
    }

    #[test]
    fn missing_keys_are_left_out() {
        let ds = dataset(&[Some("Meta"), None, Some("Meta")]);
        let groups = group_by(&ds, CategoryColumn::Platform, GroupOrder::Sorted);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 2);
        // roas of rows 0 and 2
        assert_eq!(groups[0].mean(NumericColumn::Roas), 1.0);
    }
}
