//! Resolver contracts: which trait declares which field.
//!
//! Every object, interface and root operation type becomes a trait. A field
//! an object inherits from one of its interfaces with an identical signature
//! is declared only once, on the interface; the generated schema calls it
//! through that trait. Both emitters read the same [`Contracts`] so the
//! declarations and the calls agree.

use crate::names::{NameMapper, Scope};
use crate::Result;
use gqlgen_schema::{Field, InputValue, NamedType, OperationType, Schema, TypeKind};
use rustc_hash::FxHashMap;

/// Method names every generated trait inherits from `IntoAny`.
const INHERITED_METHODS: &[&str] = &["into_any", "type_name"];

/// Parameter names that follow the arguments of every resolver.
const TRAILING_PARAMETERS: &[&str] = &["context", "info"];

/// A resolver method.
#[derive(Debug)]
pub struct Method<'s> {
    pub field: &'s Field,
    pub ident: String,
    /// Argument identifiers, parallel to `field.arguments`.
    pub args: Vec<String>,
}

impl<'s> Method<'s> {
    /// Iterates arguments together with their identifiers.
    pub fn arguments(&self) -> impl Iterator<Item = (&'s InputValue, &str)> + '_ {
        self.field
            .arguments
            .iter()
            .zip(self.args.iter().map(String::as_str))
    }
}

/// The trait generated for one object, interface or root type.
#[derive(Debug)]
pub struct Contract<'s> {
    pub name: &'s str,
    pub trait_name: String,
    /// Set for root operation types, whose methods have no receiver.
    pub root: Option<OperationType>,
    /// Declaration names of the unions and interfaces this trait extends.
    pub supertraits: Vec<String>,
    /// Methods declared by this trait, in field order.
    pub methods: Vec<Method<'s>>,
}

/// Contracts for every object, interface and root type of a schema.
#[derive(Debug)]
pub struct Contracts<'s> {
    schema: &'s Schema,
    contracts: FxHashMap<&'s str, Contract<'s>>,
}

impl<'s> Contracts<'s> {
    /// Plans every contract. All declaration names must already be assigned.
    pub fn build(schema: &'s Schema, names: &NameMapper) -> Result<Self> {
        let mut contracts = FxHashMap::default();
        for kind in [TypeKind::Interface, TypeKind::Object] {
            for ty in schema.sorted_of_kind(kind) {
                let contract = plan(schema, names, ty)?;
                contracts.insert(ty.name(), contract);
            }
        }
        Ok(Self { schema, contracts })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Contract<'s>> {
        self.contracts.get(name)
    }

    /// Returns the contract and method that declare `field` of type `name`.
    #[must_use]
    pub fn owner(&self, name: &str, field: &str) -> Option<(&Contract<'s>, &Method<'s>)> {
        let owner = owning_type(self.schema, name, field)?;
        let contract = self.contracts.get(owner)?;
        let method = contract.methods.iter().find(|m| m.field.name == field)?;
        Some((contract, method))
    }
}

fn plan<'s>(schema: &'s Schema, names: &NameMapper, ty: &'s NamedType) -> Result<Contract<'s>> {
    let name = ty.name();
    let trait_name = declaration(names, name, ty.kind())?;
    let root = schema.root_operation(name);

    let mut supertraits = Vec::new();
    if root.is_none() {
        if ty.kind() == TypeKind::Object {
            for union in schema.unions_containing(name) {
                supertraits.push(declaration(names, union, TypeKind::Union)?);
            }
        }
        for interface in schema.transitive_interfaces(name) {
            supertraits.push(declaration(names, interface, TypeKind::Interface)?);
        }
    }

    let mut scope = Scope::with_reserved(INHERITED_METHODS);
    let mut methods = Vec::new();
    for field in ty.fields() {
        if owning_type(schema, name, &field.name) != Some(name) {
            continue;
        }
        let mut parameters = Scope::with_reserved(TRAILING_PARAMETERS);
        let args = field
            .arguments
            .iter()
            .map(|arg| parameters.allocate(&arg.name))
            .collect::<Result<_>>()?;
        methods.push(Method {
            field,
            ident: scope.allocate(&field.name)?,
            args,
        });
    }

    Ok(Contract {
        name,
        trait_name,
        root,
        supertraits,
        methods,
    })
}

fn declaration(names: &NameMapper, name: &str, kind: TypeKind) -> Result<String> {
    match names.declaration(name) {
        Some(declared) => Ok(declared.to_string()),
        None => Err(crate::Error::name_mapping(
            name,
            format!("no declaration name was assigned to {kind} `{name}`"),
        )),
    }
}

/// Finds the type whose trait declares `field` of `name`: the first
/// interface, in name order, that declares a field with the same signature,
/// followed recursively. Root operation types declare all of their fields.
fn owning_type<'s>(schema: &'s Schema, name: &'s str, field: &str) -> Option<&'s str> {
    let ty = schema.get(name)?;
    let own = ty.fields().iter().find(|f| f.name == field)?;
    if schema.is_root(name) {
        return Some(name);
    }
    for interface in schema.transitive_interfaces(name) {
        let inherited = schema
            .get(interface)
            .and_then(|i| i.fields().iter().find(|f| f.name == field));
        if inherited.is_some_and(|f| f.same_signature(own)) {
            return owning_type(schema, interface, field);
        }
    }
    Some(name)
}
