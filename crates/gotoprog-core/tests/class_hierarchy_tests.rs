use gotoprog_core::optimizer::analysis::ClassHierarchy;
use gotoprog_test_helpers::ClassTableBuilder;
use proptest::prelude::*;

#[test]
fn test_multi_level_descendants() {
    let table = ClassTableBuilder::new()
        .class("Shape", &[])
        .class("Polygon", &["Shape"])
        .class("Circle", &["Shape"])
        .class("Square", &["Polygon"])
        .class("Unit", &["Square"])
        .build();
    let hierarchy = ClassHierarchy::build(&table);
    let id = |name: &str| table.intern(name);

    assert_eq!(
        hierarchy.transitive_children(id("Shape")),
        vec![id("Polygon"), id("Circle"), id("Square"), id("Unit")],
        "direct children come before grandchildren"
    );
    assert_eq!(
        hierarchy.transitive_parents(id("Unit")),
        vec![id("Square"), id("Polygon"), id("Shape")]
    );
    assert!(hierarchy.transitive_children(id("Unit")).is_empty());
}

#[test]
fn test_parents_keep_declaration_order() {
    let table = ClassTableBuilder::new()
        .class("Readable", &[])
        .class("Writable", &[])
        .class("Stream", &["Writable", "Readable"])
        .build();
    let hierarchy = ClassHierarchy::build(&table);

    assert_eq!(
        hierarchy.parents(table.intern("Stream")),
        &[table.intern("Writable"), table.intern("Readable")]
    );
}

#[test]
fn test_non_class_symbols_ignored() {
    let table = ClassTableBuilder::new()
        .class("Base", &[])
        .class("Derived", &["Base"])
        .method("Base", "run")
        .function("main")
        .build();
    let hierarchy = ClassHierarchy::build(&table);

    assert_eq!(hierarchy.len(), 2);
    assert!(!hierarchy.is_known_class(table.intern("Base.run")));
    assert!(!hierarchy.is_known_class(table.intern("main")));
}

#[test]
fn test_dot_output_has_one_edge_per_base() {
    let table = ClassTableBuilder::new()
        .class("A", &[])
        .class("B", &[])
        .class("C", &["A", "B"])
        .build();
    let dot = ClassHierarchy::build(&table).output_dot();

    assert!(dot.contains("rankdir=BT;"));
    assert_eq!(dot.matches("->").count(), 2);
    assert!(dot.contains("\"C\" -> \"A\""));
    assert!(dot.contains("\"C\" -> \"B\""));
}

/// Class `i` may derive from any class declared before it.
fn hierarchy_shape() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n).prop_map(
            |masks| {
                masks
                    .into_iter()
                    .enumerate()
                    .map(|(i, mask)| (0..i).filter(|j| mask[*j]).collect())
                    .collect()
            },
        )
    })
}

fn build_from_shape(shape: &[Vec<usize>]) -> gotoprog_core::SymbolTable {
    let names: Vec<String> = (0..shape.len()).map(|i| format!("C{}", i)).collect();
    let mut builder = ClassTableBuilder::new();
    for (i, bases) in shape.iter().enumerate() {
        let bases: Vec<&str> = bases.iter().map(|b| names[*b].as_str()).collect();
        builder = builder.class(&names[i], &bases);
    }
    builder.build()
}

proptest! {
    #[test]
    fn prop_edges_are_symmetric(shape in hierarchy_shape()) {
        let table = build_from_shape(&shape);
        let hierarchy = ClassHierarchy::build(&table);

        for i in 0..shape.len() {
            let class = table.intern(&format!("C{}", i));
            for parent in hierarchy.parents(class) {
                prop_assert!(hierarchy.children(*parent).contains(&class));
            }
            for child in hierarchy.children(class) {
                prop_assert!(hierarchy.parents(*child).contains(&class));
            }
        }
    }

    #[test]
    fn prop_transitive_queries_agree(shape in hierarchy_shape()) {
        let table = build_from_shape(&shape);
        let hierarchy = ClassHierarchy::build(&table);

        for i in 0..shape.len() {
            let class = table.intern(&format!("C{}", i));
            let ancestors = hierarchy.transitive_parents(class);

            let mut unique = ancestors.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), ancestors.len(), "no class reported twice");

            for ancestor in ancestors {
                prop_assert!(hierarchy.transitive_children(ancestor).contains(&class));
            }
        }
    }
}
