#[cfg(test)]
mod tests {
    use measureforge::model::TableRef;
    use measureforge::planner::{MeasureBatchPlanner, PlanError};

    fn table(name: &str) -> TableRef {
        TableRef {
            name: name.to_string(),
            qualified_reference: format!("'{}'", name),
            is_system_or_hidden: false,
            is_calculation_group: false,
        }
    }

    fn calc_group(name: &str) -> TableRef {
        TableRef {
            is_calculation_group: true,
            ..table(name)
        }
    }

    #[test]
    fn plans_one_measure_per_qualifying_table_plus_rollup() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("Customers"), table("Measures")];

        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();
        assert_eq!(batch.plans.len(), 2);
        assert!(batch.rollup.is_some());
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn excluded_table_name_is_case_insensitive() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Sales"), table("SALES"), table("Orders")];

        let batch = planner.plan_from_tables(&tables, "sales", "Counts").unwrap();
        let names: Vec<&str> = batch.plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Records (Orders)"]);
    }

    #[test]
    fn date_table_markers_are_excluded_at_any_position() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![
            table("LocalDateTable_abc123"),
            table("prefix LocalDateTable"),
            table("a DateTableTemplate b"),
            table("DateTableTemplate_xyz"),
            table("Orders"),
        ];

        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();
        let names: Vec<&str> = batch.plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Records (Orders)"]);
    }

    #[test]
    fn calculation_group_and_hidden_tables_are_excluded() {
        let planner = MeasureBatchPlanner::default();
        let hidden = TableRef {
            is_system_or_hidden: true,
            ..table("Internal")
        };
        let tables = vec![calc_group("Time Intelligence"), hidden, table("Orders")];

        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();
        assert_eq!(batch.plans.len(), 1);
        assert_eq!(batch.plans[0].name, "Records (Orders)");
    }

    #[test]
    fn plan_fields_follow_the_row_count_templates() {
        let planner = MeasureBatchPlanner::default();
        let batch = planner
            .plan_from_tables(&[table("Orders")], "Measures", "Counts")
            .unwrap();

        let plan = &batch.plans[0];
        assert_eq!(plan.target_table_name, "Measures");
        assert_eq!(plan.name, "Records (Orders)");
        assert_eq!(plan.expression, "COUNTROWS ( 'Orders' )");
        assert_eq!(plan.format_string, "#,#");
        assert_eq!(plan.description, "Count of records in 'Orders'");
        assert_eq!(plan.display_folder, "Counts");
    }

    #[test]
    fn rollup_joins_qualified_references_in_batch_order() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("Customers"), table("Products")];

        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();
        let rollup = batch.rollup.as_ref().unwrap();
        assert_eq!(rollup.name, "Total Records");
        assert_eq!(
            rollup.expression,
            "'Records (Orders)' + 'Records (Customers)' + 'Records (Products)'"
        );
        assert_eq!(rollup.format_string, "#,#");
        assert_eq!(rollup.description, "Count of records in all selected tables");
        assert_eq!(rollup.display_folder, "Counts");
    }

    #[test]
    fn single_table_rollup_has_no_separator() {
        let planner = MeasureBatchPlanner::default();
        let batch = planner
            .plan_from_tables(&[table("Orders")], "Measures", "Counts")
            .unwrap();
        assert_eq!(
            batch.rollup.unwrap().expression,
            "'Records (Orders)'"
        );
    }

    #[test]
    fn zero_qualifying_tables_is_an_empty_selection() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Measures"), calc_group("Calc Group")];

        let err = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap_err();
        assert!(matches!(err, PlanError::EmptySelection(_)));
    }

    #[test]
    fn end_to_end_example() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("Customers"), calc_group("Calc Group")];

        let batch = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap();

        assert_eq!(batch.plans[0].name, "Records (Orders)");
        assert_eq!(batch.plans[0].expression, "COUNTROWS ( 'Orders' )");
        assert_eq!(batch.plans[0].format_string, "#,#");
        assert_eq!(batch.plans[0].description, "Count of records in 'Orders'");
        assert_eq!(batch.plans[0].display_folder, "Counts");

        assert_eq!(batch.plans[1].name, "Records (Customers)");
        assert_eq!(batch.plans[1].expression, "COUNTROWS ( 'Customers' )");

        let rollup = batch.rollup.unwrap();
        assert_eq!(rollup.name, "Total Records");
        assert_eq!(
            rollup.expression,
            "'Records (Orders)' + 'Records (Customers)'"
        );
        assert_eq!(rollup.display_folder, "Counts");
    }

    #[test]
    fn duplicate_table_names_collide() {
        let planner = MeasureBatchPlanner::default();
        let tables = vec![table("Orders"), table("orders")];

        // Both survive the filter but generate clashing measure names.
        let err = planner
            .plan_from_tables(&tables, "Measures", "Counts")
            .unwrap_err();
        assert!(matches!(err, PlanError::NameCollision { .. }));
    }
}
