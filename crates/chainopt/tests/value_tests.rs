//! Tracking through dynamically-typed values

use chainopt::*;
use pretty_assertions::assert_eq;

#[test]
fn test_dynamic_plain_is_shallow() {
    let opt = Tracked::some(Value::I64(3));
    assert_eq!(opt.policy(), Policy::Shallow);
    assert!(opt.is_some());
    assert_eq!(opt.unwrap().as_i64(), Some(3));
}

#[test]
fn test_nil_is_absent() {
    assert!(is_absent(&Value::Nil));
    assert!(wrap(Value::Nil).is_none());
    assert_eq!(wrap(Value::Nil).policy(), Policy::Deep);
    assert!(Tracked::try_some(Value::Nil).is_err());
}

#[test]
fn test_recursion_crosses_the_dynamic_boundary() {
    let slot = Ptr::new(Value::string("payload"));
    let opt = Tracked::some(Value::Ref(slot.clone()));
    assert_eq!(opt.policy(), Policy::Deep);
    assert!(opt.is_some());
    assert_eq!(slot.get().unwrap().as_str(), Some("payload"));

    slot.set(Value::Nil).unwrap();
    assert!(opt.is_none());

    slot.set(Value::reference(Value::Unit)).unwrap();
    assert!(opt.is_some());
}

#[test]
fn test_pointer_to_dynamic_value() {
    let inner = Value::reference(Value::I64(1));
    let ptr = Ptr::new(inner.clone());
    let opt = Tracked::some(ptr);
    assert_eq!(opt.policy(), Policy::Deep);

    inner.as_ref_ptr().unwrap().set(Value::Nil).unwrap();
    assert!(opt.is_none());
}

#[test]
fn test_dynamic_map_null_state() {
    let holder = Ptr::new(Value::map([("a", Value::I64(1))]));
    let opt = Tracked::some(holder.clone());
    assert!(opt.is_some());

    holder.set(Value::Map(MapRef::null())).unwrap();
    assert!(opt.is_none());
}

#[test]
fn test_function_value_is_callable_while_present() -> anyhow::Result<()> {
    let sum = Value::function(|args| {
        Value::I64(args.iter().filter_map(Value::as_i64).sum())
    });
    let opt = Tracked::some(sum);

    let result = match opt.value()? {
        Value::Function(f) => f.call(vec![Value::I64(2), Value::I64(3)])?,
        other => anyhow::bail!("unexpected {}", other.type_name()),
    };
    assert_eq!(result, Value::I64(5));
    Ok(())
}

#[test]
fn test_struct_fields_are_not_walked() {
    let s = StructValue::new("Config").with_field("source", Value::Ref(Ptr::null()));
    let opt = Tracked::some(Value::structure(s));
    assert_eq!(opt.policy(), Policy::Shallow);
    assert!(opt.is_some());
    assert_eq!(
        opt.unwrap().to_string(),
        "Config { source: &Ptr(null) }"
    );

    let Value::Struct(config) = opt.unwrap() else {
        panic!("expected a struct");
    };
    let source = config.get("source").and_then(Value::as_ref_ptr);
    assert_eq!(source.map(Ptr::is_null), Some(true));
}

#[test]
fn test_opaque_value_is_checked_by_address() {
    let x = 9u64;
    let opt = Tracked::some(Value::Opaque(&x as *const u64 as *const ()));
    assert_eq!(opt.policy(), Policy::Deep);
    assert!(opt.is_some());

    assert!(is_absent(&Value::Opaque(std::ptr::null())));
}

#[test]
fn test_swap_between_dynamic_shapes() {
    let mut opt = Tracked::some(Value::I64(1));
    assert_eq!(opt.swap(Value::string("s")), Some(Value::I64(1)));
    assert_eq!(opt.swap(Value::Nil), Some(Value::string("s")));
    assert!(opt.is_none());
    assert_eq!(opt.swap(Value::Bool(true)), None);
    assert_eq!(opt.take(), Ok(Value::Bool(true)));
}

#[test]
fn test_cyclic_value_chain_is_reported() {
    let slot = Ptr::new(Value::Nil);
    let looped = Value::Ref(slot.clone());
    slot.set(looped.clone()).unwrap();

    assert!(matches!(probe(&looped), Err(TrackError::CyclicChain { .. })));

    let opt = wrap(looped.clone());
    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| opt.is_none()));
    assert!(caught.is_err());

    slot.set(Value::Nil).unwrap();
    assert_eq!(probe(&looped), Ok(true));
}
