//! Portable classes shared by the tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::sync::atomic::{AtomicUsize, Ordering};

use pof_io::accessor::{getter, setter};
use pof_io::{Codec, Codecs, EvolvableState, PofError, PofReader, PofWriter, ReflectEvolvable};
use pof_reflect::{Class, Method};
use pof_reflect::registry::ClassRegistry;

use crate::annotation::{Portable, PortableProperty};

/// Declares a marked getter and an unmarked setter for `$field`.
macro_rules! property {
    ($builder:expr, $ty:ty, $field:ident: $value:ty, $get:literal, $set:literal, $marker:expr) => {
        $builder
            .method(getter($get, |v: &$ty| v.$field.clone()).with_marker($marker))
            .method(setter($set, |v: &mut $ty, x: $value| v.$field = x))
    };
}

fn implied() -> PortableProperty {
    PortableProperty::implied()
}

// -----------------------------------------------------------------------------
// Poffed

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Poffed {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub adult: bool,
    evolvable: EvolvableState,
}

impl Poffed {
    pub fn new(first_name: &str, last_name: &str, age: i32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            ..Self::default()
        }
    }
}

pof_io::impl_evolvable!(Poffed, evolvable, 0);

pub(crate) fn poffed_class() -> Arc<Class> {
    let builder = Class::builder::<Poffed>("Poffed")
        .default_constructor()
        .marker(Portable)
        .with_trait(ReflectEvolvable::of::<Poffed>());
    let builder = property!(builder, Poffed, first_name: String, "getFirstName", "setFirstName", PortableProperty::new(2));
    let builder = property!(
        builder,
        Poffed,
        last_name: String,
        "getLastName",
        "setLastName",
        PortableProperty::new(0).with_codec(Codecs::default_codec())
    );
    let builder = property!(builder, Poffed, age: i32, "getAge", "setAge", PortableProperty::new(1));
    builder
        .method(getter("isAdult", |p: &Poffed| p.adult))
        .method(setter("setAdult", |p: &mut Poffed, v: bool| p.adult = v).with_marker(PortableProperty::new(3)))
        .build()
}

/// Extends `Poffed`, declaring only its state.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct BewilderedPerson {
    pub person: Poffed,
    pub state: String,
}

impl BewilderedPerson {
    pub fn new(first_name: &str, last_name: &str, age: i32, state: &str) -> Self {
        Self {
            person: Poffed::new(first_name, last_name, age),
            state: state.into(),
        }
    }
}

pub(crate) fn bewildered_person_class(person: Arc<Class>) -> Arc<Class> {
    type T = BewilderedPerson;
    let builder = Class::builder::<T>("BewilderedPerson")
        .default_constructor()
        .marker(Portable)
        .extends(person, |b: &T| &b.person, |b: &mut T| &mut b.person);
    property!(builder, T, state: String, "getState", "setState", implied()).build()
}

// -----------------------------------------------------------------------------
// Index policy fixtures

#[derive(Debug, Default)]
pub(crate) struct PoffedImpliedIndices {
    first_name: String,
    last_name: String,
    age: i32,
}

pub(crate) fn implied_indices_class() -> Arc<Class> {
    type T = PoffedImpliedIndices;
    let builder = Class::builder::<T>("PoffedImpliedIndices")
        .default_constructor()
        .marker(Portable);
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", PortableProperty::new(1));
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, T, age: i32, "getAge", "setAge", PortableProperty::new(-1));
    builder.build()
}

#[derive(Debug, Default)]
pub(crate) struct PoffedClashingIndices {
    first_name: String,
    last_name: String,
    age: i32,
    age2: i32,
}

pub(crate) fn clashing_indices_class() -> Arc<Class> {
    type T = PoffedClashingIndices;
    let builder = Class::builder::<T>("PoffedClashingIndices")
        .default_constructor()
        .marker(Portable);
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", PortableProperty::new(1));
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, T, age: i32, "getAge", "setAge", PortableProperty::new(1));
    let builder = property!(builder, T, age2: i32, "getAge2", "setAge2", PortableProperty::new(-1));
    builder.build()
}

#[derive(Debug, Default)]
pub(crate) struct Unmarked {
    name: String,
}

pub(crate) fn unmarked_class() -> Arc<Class> {
    let builder = Class::builder::<Unmarked>("Unmarked").default_constructor();
    property!(builder, Unmarked, name: String, "getName", "setName", PortableProperty::new(0)).build()
}

#[derive(Debug, Default)]
pub(crate) struct GetterOnly {
    name: String,
}

pub(crate) fn getter_only_class() -> Arc<Class> {
    Class::builder::<GetterOnly>("GetterOnly")
        .default_constructor()
        .marker(Portable)
        .method(getter("getName", |g: &GetterOnly| g.name.clone()).with_marker(implied()))
        .build()
}

// -----------------------------------------------------------------------------
// Custom codec

/// Writes a list of aliases as one newline separated string, counting calls.
#[derive(Debug, Default)]
pub(crate) struct AliasesCodec {
    pub encoded: AtomicUsize,
    pub decoded: AtomicUsize,
}

impl Codec for AliasesCodec {
    fn encode(&self, writer: &mut dyn PofWriter, index: i32, value: &dyn Any) -> Result<(), PofError> {
        self.encoded.fetch_add(1, Ordering::Relaxed);
        let aliases = value.downcast_ref::<Vec<String>>().ok_or(PofError::ValueType {
            index,
            expected: "Vec<String>",
        })?;
        writer.write_string(index, &aliases.join("\n"))
    }

    fn decode(&self, reader: &mut dyn PofReader, index: i32) -> Result<Option<Box<dyn Any>>, PofError> {
        self.decoded.fetch_add(1, Ordering::Relaxed);
        if reader.read_null(index)? {
            return Ok(None);
        }
        let joined = reader.read_string(index)?;
        let aliases: Vec<String> = joined
            .split('\n')
            .filter(|alias| !alias.is_empty())
            .map(String::from)
            .collect();
        Ok(Some(Box::new(aliases)))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PoffedCustomCodec {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub aliases: Vec<String>,
}

pub(crate) fn custom_codec_class(codec: Arc<AliasesCodec>) -> Arc<Class> {
    type T = PoffedCustomCodec;
    let builder = Class::builder::<T>("PoffedCustomCodec")
        .default_constructor()
        .marker(Portable);
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", implied());
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, T, age: i32, "getAge", "setAge", implied());
    builder
        .method(
            Method::getter("getAliases", |p: &T| p.aliases.clone())
                .with_marker(PortableProperty::implied().with_codec(codec)),
        )
        .method(Method::setter("setAliases", |p: &mut T, v: Vec<String>| p.aliases = v))
        .build()
}

// -----------------------------------------------------------------------------
// Evolution

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PersonV1 {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    evolvable: EvolvableState,
}

impl PersonV1 {
    pub fn new(first_name: &str, last_name: &str, age: i32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            ..Self::default()
        }
    }
}

pof_io::impl_evolvable!(PersonV1, evolvable, 0);

pub(crate) fn person_v1_class() -> Arc<Class> {
    type T = PersonV1;
    let builder = Class::builder::<T>("PersonV1")
        .default_constructor()
        .marker(Portable)
        .with_trait(ReflectEvolvable::of::<T>());
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", PortableProperty::new(2));
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", PortableProperty::new(0));
    let builder = property!(builder, T, age: i32, "getAge", "setAge", PortableProperty::new(1));
    builder.build()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PersonV2 {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub adult: bool,
    pub male: Option<bool>,
    evolvable: EvolvableState,
}

pof_io::impl_evolvable!(PersonV2, evolvable, 1);

pub(crate) fn person_v2_class() -> Arc<Class> {
    type T = PersonV2;
    let builder = Class::builder::<T>("PersonV2")
        .default_constructor()
        .marker(Portable)
        .with_trait(ReflectEvolvable::of::<T>());
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", PortableProperty::new(2));
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", PortableProperty::new(0));
    let builder = property!(builder, T, age: i32, "getAge", "setAge", PortableProperty::new(1));
    let builder = property!(builder, T, adult: bool, "isAdult", "setAdult", PortableProperty::new(3));
    let builder = property!(builder, T, male: Option<bool>, "isMale", "setMale", PortableProperty::new(4));
    builder.build()
}

// -----------------------------------------------------------------------------
// Ancestry

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Child {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
}

impl Child {
    pub fn new(first_name: &str, last_name: &str, age: i32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Father {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub child: Option<Child>,
}

impl Father {
    pub fn new(first_name: &str, last_name: &str, age: i32, child: Option<Child>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            child,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct GrandFather {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub father: Option<Father>,
}

impl GrandFather {
    pub fn new(first_name: &str, last_name: &str, age: i32, father: Option<Father>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            father,
        }
    }
}

pof_io::impl_user_type!(Child, Father);

pub(crate) fn child_class() -> Arc<Class> {
    let builder = Class::builder::<Child>("Child").default_constructor().marker(Portable);
    let builder = property!(builder, Child, first_name: String, "getFirstName", "setFirstName", implied());
    let builder = property!(builder, Child, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, Child, age: i32, "getAge", "setAge", implied());
    builder.build()
}

pub(crate) fn father_class() -> Arc<Class> {
    let builder = Class::builder::<Father>("Father").default_constructor().marker(Portable);
    let builder = property!(builder, Father, first_name: String, "getFirstName", "setFirstName", implied());
    let builder = property!(builder, Father, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, Father, age: i32, "getAge", "setAge", implied());
    let builder = property!(builder, Father, child: Option<Child>, "getChild", "setChild", implied());
    builder.build()
}

pub(crate) fn grand_father_class() -> Arc<Class> {
    type T = GrandFather;
    let builder = Class::builder::<T>("GrandFather").default_constructor().marker(Portable);
    let builder = property!(builder, T, first_name: String, "getFirstName", "setFirstName", implied());
    let builder = property!(builder, T, last_name: String, "getLastName", "setLastName", implied());
    let builder = property!(builder, T, age: i32, "getAge", "setAge", implied());
    let builder = property!(builder, T, father: Option<Father>, "getFather", "setFather", implied());
    builder.build()
}

// -----------------------------------------------------------------------------
// Registry

/// Every portable fixture class, resolved by type like a class loader.
pub(crate) fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    let person = poffed_class();
    registry.register(person.clone());
    registry.register(bewildered_person_class(person));
    for class in [
        person_v1_class(),
        person_v2_class(),
        child_class(),
        father_class(),
        grand_father_class(),
    ] {
        registry.register(class);
    }
    registry
}

/// Resolves the registered class of `T`.
pub(crate) fn load<T: 'static>(registry: &ClassRegistry) -> Arc<Class> {
    registry.get_type::<T>().cloned().unwrap()
}
