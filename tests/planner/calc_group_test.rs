#[cfg(test)]
mod tests {
    use measureforge::model::TableRef;
    use measureforge::planner::{CalculationGroupPlanner, MeasureBatchPlanner};

    fn table(name: &str) -> TableRef {
        TableRef {
            name: name.to_string(),
            qualified_reference: format!("'{}'", name),
            is_system_or_hidden: false,
            is_calculation_group: false,
        }
    }

    #[test]
    fn one_item_per_non_rollup_measure() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("Customers"), table("Products")];
        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();

        let group = CalculationGroupPlanner::plan(&batch, "Table Counts");
        assert_eq!(group.items.len(), batch.plans.len());
        // The roll-up is never wrapped in a calculation item.
        assert!(group.items.iter().all(|i| i.item_name != "Total Records"));
    }

    #[test]
    fn items_preserve_batch_order_and_reference_measures() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("Customers")];
        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();

        let group = CalculationGroupPlanner::plan(&batch, "Table Counts");

        assert_eq!(group.items[0].item_name, "Records (Orders)");
        assert_eq!(group.items[0].expression, "'Records (Orders)'");
        assert_eq!(group.items[1].item_name, "Records (Customers)");
        assert_eq!(group.items[1].expression, "'Records (Customers)'");
        assert!(group.items.iter().all(|i| i.group_name == "Table Counts"));
    }

    #[test]
    fn group_metadata_defaults() {
        let planner = MeasureBatchPlanner::default();
        let batch = planner
            .plan_from_tables(&[table("Orders")], "Measures", "Counts")
            .unwrap();

        let group = CalculationGroupPlanner::plan(&batch, "Table Counts");
        assert_eq!(group.name, "Table Counts");
        assert_eq!(group.grouping_column_name, "Table Name");
        assert_eq!(group.precedence, 1);
    }
}
