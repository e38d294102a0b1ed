use regex::Regex;
use schemaforge::prelude::*;
use schemaforge::{MapperContext, ModelComposer, PatternNamingResolver, find_cycles};

fn linked(name: &str, next: &str) -> ModelDescriptor {
    let fk = format!("{}Id", next.to_lowercase());
    ModelDescriptor::new(name)
        .field(FieldDescriptor::scalar("id", "Int").id())
        .field(FieldDescriptor::scalar(fk.clone(), "Int"))
        .field(FieldDescriptor::relation(
            next.to_lowercase(),
            RelationInfo::new(next).from_fields([fk]).references(["id"]),
        ))
}

fn exported_symbols(content: &str) -> Vec<String> {
    let re = Regex::new(r"(?m)^export (?:const|type) (\w+)").unwrap();
    re.captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

#[test]
fn test_three_model_cycle_reported_once() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let collection = generator.generate(
        &[linked("A", "B"), linked("B", "C"), linked("C", "A")],
        &[],
    );

    let graph = &collection.graph;
    assert_eq!(graph.cycles.len(), 1);
    assert_eq!(graph.cycles[0], vec!["A", "B", "C", "A"]);
    for name in ["A", "B", "C"] {
        assert!(graph.cycles[0].iter().any(|n| n == name));
    }
    assert!(graph.errors.is_empty());

    // Cycles never block output.
    assert_eq!(collection.summary.models_processed, 3);
    assert_eq!(collection.summary.cycles.len(), 1);
    assert!(collection.module("A").unwrap().content.contains("z.lazy(() => BSchema)"));
    assert!(collection.summary.render_plain().contains("A -> B -> C -> A"));
}

#[test]
fn test_build_graph_directly() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let compositions: Vec<_> = [linked("A", "B"), linked("B", "Missing")]
        .iter()
        .map(|m| generator.compose(m).unwrap())
        .collect();

    let report = build_graph(&compositions);
    assert!(report.cycles.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].model, "B");
    assert_eq!(report.errors[0].symbol, "MissingSchema");
    assert_eq!(report.dependencies_of("A").collect::<Vec<_>>(), vec!["B"]);
    assert!(find_cycles(&report.edges).is_empty());
}

#[test]
fn test_output_is_idempotent_except_timestamp() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let model = linked("Order", "Customer").field(
        FieldDescriptor::scalar("total", "Decimal").doc("Order total\n@zod.refine((v) => true)"),
    );

    let first = generator.render(&generator.compose(&model).unwrap()).unwrap();
    let second = generator.render(&generator.compose(&model).unwrap()).unwrap();

    let a: Vec<&str> = first.stable_lines().collect();
    let b: Vec<&str> = second.stable_lines().collect();
    assert_eq!(a, b);
    assert_eq!(first.file_name, second.file_name);
    assert_eq!(first.imports, second.imports);
    assert_eq!(first.dependencies, second.dependencies);
}

#[test]
fn test_export_round_trip() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let module = generator
        .render(&generator.compose(&linked("Post", "User")).unwrap())
        .unwrap();
    assert_eq!(
        exported_symbols(&module.content),
        vec!["PostSchema", "PostType", "PostModel"]
    );
    assert_eq!(exported_symbols(&module.content), module.exports);

    let config = GeneratorConfig::default().legacy_aliases(false);
    let generator = Generator::new(config).unwrap();
    let module = generator
        .render(&generator.compose(&linked("Post", "User")).unwrap())
        .unwrap();
    assert_eq!(
        exported_symbols(&module.content),
        vec!["PostSchema", "PostType"]
    );
}

#[test]
fn test_custom_naming_flows_through_imports_and_index() {
    let naming = PatternNamingResolver::new()
        .schema_pattern("{Model}Validator")
        .file_pattern("{Model}.validator");
    let generator = Generator::new(GeneratorConfig::default())
        .unwrap()
        .with_naming(naming);

    let collection = generator.generate(&[linked("Post", "User"), linked("User", "Post")], &[]);
    let post = collection.module("Post").unwrap();
    assert_eq!(post.file_name, "Post.validator.ts");
    assert!(post.content.contains("import { UserValidator } from \"./User.validator\";"));
    assert!(post.content.contains("export const PostValidator = z.object({"));
    assert!(post.warnings.is_empty());
    assert!(collection.index.content.contains("export * from \"./Post.validator\";"));
}

#[test]
fn test_lean_mode_preserves_validation() {
    let model = linked("Post", "User")
        .field(FieldDescriptor::scalar("title", "String").doc("Headline\n@zod.min(3)"));

    let full = Generator::new(GeneratorConfig::default()).unwrap();
    let lean = Generator::new(GeneratorConfig::default().lean(true)).unwrap();
    let full_module = full.render(&full.compose(&model).unwrap()).unwrap();
    let lean_module = lean.render(&lean.compose(&model).unwrap()).unwrap();

    let entry = Regex::new(r"^  [A-Za-z_$][\w$]*: ").unwrap();
    let field_lines = |content: &str| -> Vec<String> {
        content
            .lines()
            .filter(|l| entry.is_match(l))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(
        field_lines(&full_module.content),
        field_lines(&lean_module.content)
    );
    assert!(lean_module.content.len() < full_module.content.len());
}

#[test]
fn test_composer_with_custom_collaborators() {
    let config = GeneratorConfig::default();
    let naming = PatternNamingResolver::default();
    let annotations = schemaforge::CommentAnnotationExtractor::new();
    let ctx = MapperContext::new(&config, &naming, &annotations);
    let composition = ModelComposer::new(ctx).compose(&linked("A", "B")).unwrap();
    assert_eq!(composition.schema_symbol(), "ASchema");
}
