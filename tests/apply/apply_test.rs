#[cfg(test)]
mod tests {
    use measureforge::apply::{ApplyEngine, ApplyError};
    use measureforge::catalog::AggregationCatalog;
    use measureforge::host::{HostError, MemoryModel, ModelReader};
    use measureforge::host::memory::MemoryTable;
    use measureforge::planner::{CalculationGroupPlanner, MeasureBatchPlanner};

    fn column_model() -> MemoryModel {
        MemoryModel::new(vec![
            MemoryTable::new("Sales")
                .with_column("Amount", true)
                .with_column("Quantity", true),
            MemoryTable::new("Orders").with_column("Freight", true),
        ])
    }

    fn table_model() -> MemoryModel {
        MemoryModel::new(vec![
            MemoryTable::new("Orders"),
            MemoryTable::new("Customers"),
            MemoryTable::new("Measures"),
        ])
    }

    #[test]
    fn column_batch_lands_in_each_columns_table() {
        let catalog = AggregationCatalog::builtin();
        let planner = MeasureBatchPlanner::default();
        let mut model = column_model();

        let batch = planner
            .plan_from_columns(&model.list_selected_columns(), catalog.lookup("SUM").unwrap())
            .unwrap();
        let stats = ApplyEngine::apply(&mut model, &batch, None).unwrap();

        assert_eq!(stats.measures_created, 3);
        assert_eq!(stats.calc_items_created, 0);
        assert_eq!(stats.groups_created, 0);

        let sales = model.table("Sales").unwrap();
        assert_eq!(sales.measures.len(), 2);
        assert_eq!(sales.measures[0].name, "Sum of Amount");
        assert_eq!(sales.measures[0].expression, "SUM ( 'Sales'[Amount] )");

        let orders = model.table("Orders").unwrap();
        assert_eq!(orders.measures.len(), 1);
        assert_eq!(orders.measures[0].name, "Sum of Freight");
    }

    #[test]
    fn row_count_batch_with_group_creates_everything() {
        let planner = MeasureBatchPlanner::default();
        let mut model = table_model();

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();
        let group = CalculationGroupPlanner::plan(&batch, "Table Counts");
        let stats = ApplyEngine::apply(&mut model, &batch, Some(&group)).unwrap();

        // Two row-count measures plus the roll-up.
        assert_eq!(stats.measures_created, 3);
        assert_eq!(stats.calc_items_created, 2);
        assert_eq!(stats.groups_created, 1);

        let measures = model.table("Measures").unwrap();
        let names: Vec<&str> = measures.measures.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Records (Orders)", "Records (Customers)", "Total Records"]
        );

        let stored_group = &model.calculation_groups[0];
        assert_eq!(stored_group.name, "Table Counts");
        assert_eq!(stored_group.grouping_column_name, "Table Name");
        assert_eq!(stored_group.precedence, 1);
        assert_eq!(stored_group.items.len(), 2);
        assert_eq!(stored_group.items[0].expression, "'Records (Orders)'");
    }

    #[test]
    fn unknown_target_table_fails_with_nothing_created() {
        let planner = MeasureBatchPlanner::default();
        // The storage table is named at plan time but missing from the model.
        let mut model = MemoryModel::new(vec![
            MemoryTable::new("Orders"),
            MemoryTable::new("Customers"),
        ]);

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();

        let err = ApplyEngine::apply(&mut model, &batch, None).unwrap_err();
        assert!(matches!(
            err,
            ApplyError::Measure {
                source: HostError::UnknownTable(_),
                ..
            }
        ));
        assert!(model.table("Orders").unwrap().measures.is_empty());
    }

    #[test]
    fn reapplying_the_same_batch_collides() {
        let planner = MeasureBatchPlanner::default();
        let mut model = table_model();

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();
        ApplyEngine::apply(&mut model, &batch, None).unwrap();

        let err = ApplyEngine::apply(&mut model, &batch, None).unwrap_err();
        match err {
            ApplyError::Measure { name, source } => {
                assert_eq!(name, "Records (Orders)");
                assert!(matches!(source, HostError::DuplicateName { .. }));
            }
            other => panic!("expected a measure failure, got {:?}", other),
        }
    }

    #[test]
    fn failure_keeps_the_created_prefix() {
        let planner = MeasureBatchPlanner::default();
        let mut model = table_model();

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();

        // Pre-create the second measure's name so the first succeeds and the
        // second collides.
        let mut poisoned = batch.clone();
        poisoned.plans.truncate(1);
        poisoned.plans[0].name = "Records (Customers)".to_string();
        poisoned.rollup = None;
        ApplyEngine::apply(&mut model, &poisoned, None).unwrap();

        let err = ApplyEngine::apply(&mut model, &batch, None).unwrap_err();
        assert!(matches!(err, ApplyError::Measure { .. }));

        // No rollback: the first measure of the failed batch stays.
        let measures = model.table("Measures").unwrap();
        let names: Vec<&str> = measures.measures.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Records (Customers)", "Records (Orders)"]);
    }

    #[test]
    fn duplicate_calculation_group_fails() {
        let planner = MeasureBatchPlanner::default();
        let mut model = table_model();

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();
        let group = CalculationGroupPlanner::plan(&batch, "Table Counts");
        ApplyEngine::apply(&mut model, &batch, Some(&group)).unwrap();

        let planner2 = MeasureBatchPlanner::default();
        let batch2 = planner2
            .plan_from_tables(&model.list_tables(), "Measures", "Other")
            .unwrap();
        let group2 = CalculationGroupPlanner::plan(&batch2, "Table Counts");
        let err = ApplyEngine::apply(&mut model, &batch2, Some(&group2)).unwrap_err();
        assert!(matches!(
            err,
            ApplyError::Group {
                source: HostError::DuplicateGroup(_),
                ..
            }
        ));
    }

    #[test]
    fn model_round_trips_through_json() {
        let planner = MeasureBatchPlanner::default();
        let mut model = table_model();

        let batch = planner
            .plan_from_tables(&model.list_tables(), "Measures", "Counts")
            .unwrap();
        ApplyEngine::apply(&mut model, &batch, None).unwrap();

        let json = model.to_json_pretty().unwrap();
        let reloaded = MemoryModel::from_json(&json).unwrap();
        assert_eq!(reloaded, model);
    }
}
