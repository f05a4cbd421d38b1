use gotoprog_core::ir::ENTRY_POINT;
use gotoprog_core::{
    ConfigError, GotoModel, ModelFeatures, Optimizer, PassConfig, PassError, SymbolTable,
};
use gotoprog_test_helpers::{
    called_functions, init_test_logging, model, ClassTableBuilder, ProgramBuilder,
};

fn shapes() -> SymbolTable {
    ClassTableBuilder::new()
        .class("Shape", &[])
        .class("Circle", &["Shape"])
        .class("Square", &["Shape"])
        .method("Shape", "area")
        .method("Circle", "area")
        .method("Square", "area")
        .function("main")
        .function("unused")
        .build()
}

fn program(table: SymbolTable) -> GotoModel {
    let start = ProgramBuilder::new(&table, ENTRY_POINT).call("main").build();
    let main = ProgramBuilder::new(&table, "main")
        .virtual_call("Shape", "area")
        .build();
    let shape_area = ProgramBuilder::new(&table, "Shape.area").build();
    let circle_area = ProgramBuilder::new(&table, "Circle.area").build();
    let square_area = ProgramBuilder::new(&table, "Square.area").build();
    let unused = ProgramBuilder::new(&table, "unused").call("main").build();
    model(
        table,
        vec![
            (ENTRY_POINT, start),
            ("main", main),
            ("Shape.area", shape_area),
            ("Circle.area", circle_area),
            ("Square.area", square_area),
            ("unused", unused),
        ],
    )
}

#[test]
fn test_full_pipeline() {
    init_test_logging();
    let mut model = program(shapes());
    let mut optimizer = Optimizer::new(PassConfig {
        remove_unused_functions: true,
        ..PassConfig::default()
    });

    assert!(optimizer.optimize(&mut model).unwrap());

    let features = ModelFeatures::detect(&model);
    assert!(!features.contains(ModelFeatures::HAS_VIRTUAL_CALLS));
    assert!(features.contains(ModelFeatures::HAS_FUNCTION_CALLS | ModelFeatures::HAS_CLASSES));

    let unused = model.symbol_table.intern("unused");
    assert!(!model.goto_functions.contains(unused));
    assert_eq!(model.goto_functions.len(), 5);

    let main = &model
        .goto_functions
        .get(model.symbol_table.intern("main"))
        .unwrap()
        .body;
    assert_eq!(
        called_functions(main, &model.symbol_table),
        vec!["Shape.area", "Square.area", "Circle.area"]
    );
}

#[test]
fn test_missing_entry_point_is_an_error() {
    let mut model = program(shapes());
    let mut optimizer = Optimizer::new(PassConfig {
        remove_unused_functions: true,
        entry_point: "start".to_string(),
        ..PassConfig::default()
    });

    let err = optimizer.optimize(&mut model).unwrap_err();
    assert!(matches!(err, PassError::MissingEntryPoint(ref name) if name == "start"));
    assert_eq!(
        err.to_string(),
        "entry point `start` is not defined in the function table"
    );
}

#[test]
fn test_devirtualization_skipped_without_virtual_calls() {
    let table = shapes();
    let start = ProgramBuilder::new(&table, ENTRY_POINT).call("main").build();
    let main = ProgramBuilder::new(&table, "main").skip().build();
    let mut model = model(table, vec![(ENTRY_POINT, start), ("main", main)]);
    let before = model.to_string();

    let mut optimizer = Optimizer::new(PassConfig::default());
    assert!(!optimizer.optimize(&mut model).unwrap());
    assert_eq!(model.to_string(), before);
}

#[test]
fn test_disabled_pipeline_leaves_virtual_calls() {
    let mut model = program(shapes());
    let mut optimizer = Optimizer::new(PassConfig {
        devirtualize: false,
        ..PassConfig::default()
    });

    assert!(optimizer.pass_names().is_empty());
    assert!(!optimizer.optimize(&mut model).unwrap());
    assert!(ModelFeatures::detect(&model).contains(ModelFeatures::HAS_VIRTUAL_CALLS));
}

#[test]
fn test_custom_class_identifier_field() {
    let mut model = program(shapes());
    let mut optimizer = Optimizer::new(PassConfig {
        class_identifier_field: "@vtable_id".to_string(),
        ..PassConfig::default()
    });
    optimizer.optimize(&mut model).unwrap();

    assert!(model.to_string().contains(").@vtable_id"));
}

#[test]
fn test_invalid_config_rejected_before_any_pass() {
    let mut model = program(shapes());
    let before = model.to_string();
    let mut optimizer = Optimizer::new(PassConfig {
        class_identifier_field: String::new(),
        ..PassConfig::default()
    });

    let err = optimizer.optimize(&mut model).unwrap_err();
    assert!(matches!(err, PassError::Config(ConfigError::Invalid(_))));
    assert!(err
        .to_string()
        .contains("class_identifier_field must not be empty"));
    assert_eq!(model.to_string(), before, "model untouched");
}
