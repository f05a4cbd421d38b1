use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gotoprog_core::optimizer::analysis::ClassHierarchy;
use gotoprog_core::{remove_virtual_functions, GotoModel, SymbolTable};
use gotoprog_test_helpers::{model, ClassTableBuilder, ProgramBuilder};

/// `Base` with `width` children, each with `depth` levels below it.
/// Every other class overrides `run`.
fn wide_hierarchy(width: usize, depth: usize) -> SymbolTable {
    let mut builder = ClassTableBuilder::new().class("Base", &[]).method("Base", "run");
    for i in 0..width {
        let mut parent = "Base".to_string();
        for level in 0..depth {
            let name = format!("C{}_{}", i, level);
            builder = builder.class(&name, &[parent.as_str()]);
            if (i + level) % 2 == 0 {
                builder = builder.method(&name, "run");
            }
            parent = name;
        }
    }
    builder.build()
}

fn call_sites(table: SymbolTable, calls: usize) -> GotoModel {
    let mut main = ProgramBuilder::new(&table, "main");
    for _ in 0..calls {
        main = main.virtual_call("Base", "run");
    }
    let main = main.build();
    model(table, vec![("main", main)])
}

fn bench_hierarchy_build(c: &mut Criterion) {
    let table = wide_hierarchy(64, 4);
    c.bench_function("class_hierarchy_build", |b| {
        b.iter(|| black_box(ClassHierarchy::build(black_box(&table))))
    });
}

fn bench_remove_virtual_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_virtual_functions");
    for width in [4, 16, 64] {
        let template = call_sites(wide_hierarchy(width, 3), 32);
        group.bench_with_input(BenchmarkId::from_parameter(width), &template, |b, template| {
            b.iter(|| {
                let mut model = template.clone();
                remove_virtual_functions(&mut model);
                black_box(model)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hierarchy_build, bench_remove_virtual_functions);
criterion_main!(benches);
