//! Everything the emitters share for one run: declaration names, resolver
//! contracts and the input-object facts that shape both generated files.

use crate::contracts::Contracts;
use crate::names::{NameMapper, Scope};
use crate::{GeneratorOptions, Result};
use gqlgen_schema::{InputObjectType, NamedType, OperationType, Schema, TypeExpr, TypeKind};
use rustc_hash::{FxHashMap, FxHashSet};

/// Kinds that receive declarations, in emission order.
pub const DECLARED_KINDS: [TypeKind; 5] = [
    TypeKind::Enum,
    TypeKind::InputObject,
    TypeKind::Interface,
    TypeKind::Union,
    TypeKind::Object,
];

pub struct Plan<'s> {
    pub schema: &'s Schema,
    pub options: &'s GeneratorOptions,
    pub names: NameMapper,
    pub contracts: Contracts<'s>,
    /// `(input, field)` pairs whose value leads back to the same input.
    recursive_fields: FxHashSet<(&'s str, &'s str)>,
    /// Inputs whose values need SDL defaults filled in before decoding.
    defaulted_inputs: FxHashSet<&'s str>,
    /// Associated type of `Resolvers` per root or discriminated object.
    associated_types: FxHashMap<&'s str, String>,
}

impl<'s> Plan<'s> {
    pub fn new(schema: &'s Schema, options: &'s GeneratorOptions) -> Result<Self> {
        let mut names = NameMapper::new();
        for kind in DECLARED_KINDS {
            for ty in schema.sorted_of_kind(kind) {
                names.declare(ty.name(), kind)?;
            }
        }
        let contracts = Contracts::build(schema, &names)?;
        let inputs: Vec<&InputObjectType> = schema
            .sorted_of_kind(TypeKind::InputObject)
            .into_iter()
            .filter_map(|ty| match ty {
                NamedType::InputObject(input) => Some(input),
                _ => None,
            })
            .collect();

        let mut plan = Self {
            schema,
            options,
            names,
            contracts,
            recursive_fields: recursive_fields(schema, &inputs),
            defaulted_inputs: defaulted_inputs(schema, &inputs),
            associated_types: FxHashMap::default(),
        };
        plan.associated_types = plan.assign_associated_types()?;
        Ok(plan)
    }

    fn assign_associated_types(&self) -> Result<FxHashMap<&'s str, String>> {
        const ROOTS: [(OperationType, &str); 3] = [
            (OperationType::Query, "Query"),
            (OperationType::Mutation, "Mutation"),
            (OperationType::Subscription, "Subscription"),
        ];
        let mut scope = Scope::with_reserved(&ROOTS.map(|(_, name)| name));
        let mut associated = FxHashMap::default();
        for (operation, name) in ROOTS {
            if let Some(root) = self.schema.root(operation) {
                associated.insert(root, name.to_string());
            }
        }
        for object in self.discriminated_objects() {
            associated.insert(object, scope.allocate(object)?);
        }
        Ok(associated)
    }

    /// Returns the `Resolvers` associated type implementing `object`.
    #[must_use]
    pub fn associated_type(&self, object: &str) -> Option<&str> {
        self.associated_types.get(object).map(String::as_str)
    }

    /// Returns the `(object, associated type)` pairs of `Resolvers`: roots in
    /// operation order, then discriminated objects by name.
    #[must_use]
    pub fn resolver_types(&self) -> Vec<(&'s str, &str)> {
        let roots = [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .into_iter()
        .filter_map(|operation| self.schema.root(operation));
        roots
            .chain(self.discriminated_objects())
            .filter_map(|object| Some((object, self.associated_type(object)?)))
            .collect()
    }

    /// Every input that needs its SDL defaults filled before decoding.
    #[must_use]
    pub fn defaulted_inputs(&self) -> &FxHashSet<&'s str> {
        &self.defaulted_inputs
    }

    /// Returns every named type of `kind` that receives a declaration,
    /// sorted by name.
    #[must_use]
    pub fn sorted(&self, kind: TypeKind) -> Vec<&'s NamedType> {
        let mut types = self.schema.sorted_of_kind(kind);
        if kind == TypeKind::Scalar {
            types.retain(|ty| !ty.is_builtin_scalar());
        }
        types
    }

    /// Returns custom scalars, sorted by name.
    #[must_use]
    pub fn custom_scalars(&self) -> Vec<&'s NamedType> {
        self.sorted(TypeKind::Scalar)
    }

    #[must_use]
    pub fn is_recursive_field(&self, input: &str, field: &str) -> bool {
        self.recursive_fields.contains(&(input, field))
    }

    #[must_use]
    pub fn has_defaults(&self, input: &str) -> bool {
        self.defaulted_inputs.contains(input)
    }

    /// Returns the non-root object types values of an interface or union can
    /// be discriminated to, sorted by name.
    #[must_use]
    pub fn implementers(&self, abstract_type: &str) -> Vec<&'s str> {
        self.schema
            .possible_types(abstract_type)
            .into_iter()
            .filter(|object| !self.schema.is_root(object))
            .collect()
    }

    /// Returns the object types `Resolvers` names an implementation for:
    /// every non-root object that implements an interface or belongs to a
    /// union.
    #[must_use]
    pub fn discriminated_objects(&self) -> Vec<&'s str> {
        self.sorted(TypeKind::Object)
            .into_iter()
            .map(NamedType::name)
            .filter(|name| {
                !self.schema.is_root(name)
                    && (!self.schema.transitive_interfaces(name).is_empty()
                        || !self.schema.unions_containing(name).is_empty())
            })
            .collect()
    }

    /// Returns the interfaces and unions some field returns, sorted by name.
    /// Only these need a discriminator.
    #[must_use]
    pub fn returned_abstract_types(&self) -> Vec<&'s str> {
        let mut returned: Vec<&str> = self
            .schema
            .types
            .values()
            .flat_map(NamedType::fields)
            .map(|field| field.ty.name())
            .filter(|name| {
                matches!(
                    self.schema.kind_of(name),
                    Some(TypeKind::Interface | TypeKind::Union)
                )
            })
            .collect();
        returned.sort_unstable();
        returned.dedup();
        returned
    }

    /// Path of the runtime crate's serde re-export.
    #[must_use]
    pub fn serde_crate(&self) -> String {
        format!("{}::serde", self.options.runtime_crate)
    }
}

/// Returns the named input type of a field, unless a list sits in between.
fn direct_input<'s>(schema: &'s Schema, ty: &'s TypeExpr) -> Option<&'s InputObjectType> {
    if ty.has_list() {
        return None;
    }
    match schema.get(ty.name()) {
        Some(NamedType::InputObject(input)) => Some(input),
        _ => None,
    }
}

/// Finds input fields whose value contains the declaring input again without
/// passing through a list. Such values would have infinite size unboxed.
fn recursive_fields<'s>(
    schema: &'s Schema,
    inputs: &[&'s InputObjectType],
) -> FxHashSet<(&'s str, &'s str)> {
    let mut recursive = FxHashSet::default();
    for input in inputs {
        for field in &input.fields {
            let Some(target) = direct_input(schema, &field.ty) else {
                continue;
            };
            if leads_to(schema, target, &input.name) {
                recursive.insert((input.name.as_str(), field.name.as_str()));
            }
        }
    }
    recursive
}

fn leads_to(schema: &Schema, from: &InputObjectType, target: &str) -> bool {
    let mut seen = FxHashSet::default();
    let mut stack = vec![from];
    while let Some(current) = stack.pop() {
        if current.name == target {
            return true;
        }
        if !seen.insert(current.name.as_str()) {
            continue;
        }
        stack.extend(
            current
                .fields
                .iter()
                .filter_map(|field| direct_input(schema, &field.ty)),
        );
    }
    false
}

/// Finds inputs with a defaulted field, directly or through a nested input.
fn defaulted_inputs<'s>(schema: &'s Schema, inputs: &[&'s InputObjectType]) -> FxHashSet<&'s str> {
    let mut defaulted: FxHashSet<&str> = inputs
        .iter()
        .filter(|input| input.fields.iter().any(|f| f.default_value.is_some()))
        .map(|input| input.name.as_str())
        .collect();
    loop {
        let before = defaulted.len();
        for input in inputs {
            if input
                .fields
                .iter()
                .any(|f| defaulted.contains(f.ty.name()) && schema.kind_of(f.ty.name()) == Some(TypeKind::InputObject))
            {
                defaulted.insert(input.name.as_str());
            }
        }
        if defaulted.len() == before {
            return defaulted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlgen_schema::build_schema;

    fn plan_for(sdl: &str, test: impl FnOnce(&Plan<'_>)) {
        let schema = build_schema(sdl).schema.unwrap();
        let options = GeneratorOptions::default();
        let plan = Plan::new(&schema, &options).unwrap();
        test(&plan);
    }

    #[test]
    fn test_recursive_inputs_box_cycle_edges() {
        plan_for(
            r"
            input Tree { value: Int children: [Tree!] parent: Tree }
            input A { b: B! }
            input B { a: A name: String }
            input Leaf { tree: Tree }
            type Query { f(t: Tree, a: A, l: Leaf): Int }
            ",
            |plan| {
                assert!(plan.is_recursive_field("Tree", "parent"));
                assert!(!plan.is_recursive_field("Tree", "children"));
                assert!(plan.is_recursive_field("A", "b"));
                assert!(plan.is_recursive_field("B", "a"));
                assert!(!plan.is_recursive_field("Leaf", "tree"));
            },
        );
    }

    #[test]
    fn test_defaults_propagate_to_enclosing_inputs() {
        plan_for(
            r"
            input Page { first: Int = 10 }
            input Search { page: [Page] text: String }
            input Plain { text: String }
            type Query { f(s: Search, p: Plain): Int }
            ",
            |plan| {
                assert!(plan.has_defaults("Page"));
                assert!(plan.has_defaults("Search"));
                assert!(!plan.has_defaults("Plain"));
            },
        );
    }

    #[test]
    fn test_associated_types_avoid_root_names() {
        plan_for(
            r"
            schema { query: Root mutation: Change }
            interface Node { id: ID! }
            type Query implements Node { id: ID! }
            type Mutation implements Node { id: ID! }
            type Root { node: Node }
            type Change { node: Node }
            ",
            |plan| {
                assert_eq!(
                    plan.resolver_types(),
                    [
                        ("Root", "Query"),
                        ("Change", "Mutation"),
                        ("Mutation", "Mutation_"),
                        ("Query", "Query_"),
                    ]
                );
            },
        );
    }

    #[test]
    fn test_discrimination_sets() {
        plan_for(
            r"
            interface Node { id: ID! }
            union Feed = Post | Query
            type Post implements Node { id: ID! }
            type Tag { id: ID! }
            type Query implements Node { id: ID! feed: [Feed] }
            ",
            |plan| {
                assert_eq!(plan.implementers("Node"), ["Post"]);
                assert_eq!(plan.implementers("Feed"), ["Post"]);
                assert_eq!(plan.discriminated_objects(), ["Post"]);
                assert_eq!(plan.returned_abstract_types(), ["Feed"]);
                assert_eq!(plan.names.declaration("Tag"), Some("TagObject"));
                assert_eq!(plan.resolver_types(), [("Query", "Query"), ("Post", "Post")]);
            },
        );
    }
}
