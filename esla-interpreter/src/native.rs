use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvaluationError;
use crate::value::Value;

/// A host object exposed to scripts. Scripts reach it through `obj.prop`,
/// `obj.prop = value` and `obj.method(args)`.
pub trait NativeObject {
    fn type_name(&self) -> &str;

    fn get_property(&self, name: &str) -> Result<Value, EvaluationError>;

    fn set_property(&self, name: &str, value: Value) -> Result<(), EvaluationError>;

    fn call_method(&self, name: &str, arguments: &[Value]) -> Result<Value, EvaluationError>;
}

type Getter<T> = Box<dyn Fn(&T) -> Value>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), EvaluationError>>;
type Method<T> = Box<dyn Fn(&mut T, &[Value]) -> Result<Value, EvaluationError>>;

/// [`NativeObject`] built from per-name tables of getters, setters and
/// methods. The wrapped object stays shared with the host.
pub struct NativeObjectHandle<T> {
    object: Rc<RefCell<T>>,
    type_name: String,
    getters: HashMap<String, Getter<T>>,
    setters: HashMap<String, Setter<T>>,
    methods: HashMap<String, Method<T>>,
}

impl<T: 'static> NativeObjectHandle<T> {
    pub fn new(object: T, type_name: &str) -> Self {
        Self::from_shared(Rc::new(RefCell::new(object)), type_name)
    }

    pub fn from_shared(object: Rc<RefCell<T>>, type_name: &str) -> Self {
        NativeObjectHandle {
            object,
            type_name: type_name.to_string(),
            getters: HashMap::new(),
            setters: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    pub fn object(&self) -> Rc<RefCell<T>> {
        self.object.clone()
    }

    pub fn getter(mut self, name: &str, getter: impl Fn(&T) -> Value + 'static) -> Self {
        self.getters.insert(name.to_string(), Box::new(getter));
        self
    }

    pub fn setter(
        mut self,
        name: &str,
        setter: impl Fn(&mut T, Value) -> Result<(), EvaluationError> + 'static,
    ) -> Self {
        self.setters.insert(name.to_string(), Box::new(setter));
        self
    }

    pub fn method(
        mut self,
        name: &str,
        method: impl Fn(&mut T, &[Value]) -> Result<Value, EvaluationError> + 'static,
    ) -> Self {
        self.methods.insert(name.to_string(), Box::new(method));
        self
    }

    /// Borrows fail while a callback on the same object is still running,
    /// e.g. `obj.method(obj)`.
    fn borrow(&self) -> Result<Ref<'_, T>, EvaluationError> {
        self.object.try_borrow().map_err(|_| self.object_in_use())
    }

    fn borrow_mut(&self) -> Result<RefMut<'_, T>, EvaluationError> {
        self.object.try_borrow_mut().map_err(|_| self.object_in_use())
    }

    fn object_in_use(&self) -> EvaluationError {
        tracing::debug!(type_name = %self.type_name, "native object borrowed re-entrantly");
        EvaluationError::ObjectInUse {
            type_name: self.type_name.clone(),
        }
    }

    fn property_not_found(&self, property: &str) -> EvaluationError {
        EvaluationError::PropertyNotFound {
            type_name: self.type_name.clone(),
            property: property.to_string(),
        }
    }
}

impl<T: 'static> NativeObject for NativeObjectHandle<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_property(&self, name: &str) -> Result<Value, EvaluationError> {
        let getter = self
            .getters
            .get(name)
            .ok_or_else(|| self.property_not_found(name))?;
        Ok(getter(&*self.borrow()?))
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), EvaluationError> {
        let setter = self
            .setters
            .get(name)
            .ok_or_else(|| self.property_not_found(name))?;
        setter(&mut *self.borrow_mut()?, value)
    }

    fn call_method(&self, name: &str, arguments: &[Value]) -> Result<Value, EvaluationError> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| EvaluationError::MethodNotFound {
                type_name: self.type_name.clone(),
                method: name.to_string(),
            })?;
        method(&mut *self.borrow_mut()?, arguments)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct Person {
        pub name: String,
        pub age: i64,
        pub hobbies: Vec<String>,
    }

    pub(crate) fn person_handle(person: Rc<RefCell<Person>>) -> NativeObjectHandle<Person> {
        NativeObjectHandle::from_shared(person, "Person")
            .getter("name", |person| Value::from(person.name.as_str()))
            .setter("name", |person, value| {
                person.name = String::try_from(value)?;
                Ok(())
            })
            .getter("age", |person| Value::Int(person.age))
            .setter("age", |person, value| match value {
                Value::Int(age) => {
                    person.age = age;
                    Ok(())
                }
                _ => Err(EvaluationError::type_mismatch("age must be an integer")),
            })
            .method("introduce", |person, _| {
                Ok(Value::from(format!(
                    "Hi, I'm {} and I'm {} years old.",
                    person.name, person.age
                )))
            })
            .method("addHobby", |person, arguments| match arguments {
                [Value::String(hobby)] => {
                    person.hobbies.push(hobby.to_string());
                    Ok(Value::Null)
                }
                _ => Err(EvaluationError::type_mismatch(
                    "addHobby expects one string argument",
                )),
            })
            .method("celebrateBirthday", |person, _| {
                person.age += 1;
                Ok(Value::Int(person.age))
            })
    }

    fn alice() -> (Rc<RefCell<Person>>, NativeObjectHandle<Person>) {
        let person = Rc::new(RefCell::new(Person {
            name: "Alice".to_string(),
            age: 25,
            hobbies: Vec::new(),
        }));
        let handle = person_handle(person.clone());
        (person, handle)
    }

    #[test]
    fn test_property_round_trip() {
        let (person, handle) = alice();

        handle.set_property("age", Value::Int(26)).unwrap();
        assert_eq!(handle.get_property("age").unwrap(), Value::Int(26));
        assert_eq!(person.borrow().age, 26);
        assert_eq!(handle.type_name(), "Person");
    }

    #[test]
    fn test_setter_rejects_wrong_type() {
        let (person, handle) = alice();

        assert!(matches!(
            handle.set_property("age", Value::from("old")),
            Err(EvaluationError::TypeMismatch(_))
        ));
        assert_eq!(person.borrow().age, 25);
    }

    #[test]
    fn test_methods() {
        let (person, handle) = alice();

        assert_eq!(
            handle.call_method("introduce", &[]).unwrap(),
            Value::from("Hi, I'm Alice and I'm 25 years old.")
        );
        handle
            .call_method("addHobby", &[Value::from("reading")])
            .unwrap();
        assert_eq!(person.borrow().hobbies, vec!["reading".to_string()]);
        assert!(matches!(
            handle.call_method("addHobby", &[]),
            Err(EvaluationError::TypeMismatch(_))
        ));
    }

    pub(crate) fn counter_handle(value: i64) -> NativeObjectHandle<i64> {
        NativeObjectHandle::new(value, "Counter")
            .getter("value", |value| Value::Int(*value))
            .method("plus", |value, arguments| match arguments {
                [Value::Native(other)] => {
                    let other = i64::try_from(other.get_property("value")?)?;
                    Ok(Value::Int(*value + other))
                }
                _ => Err(EvaluationError::type_mismatch("plus expects a counter")),
            })
    }

    #[test]
    fn test_reentrant_access_is_an_error() {
        let counter: Rc<dyn NativeObject> = Rc::new(counter_handle(2));
        let other = Value::native(counter_handle(5));
        let same = Value::Native(counter.clone());

        assert_eq!(counter.call_method("plus", &[other]).unwrap(), Value::Int(7));
        assert!(matches!(
            counter.call_method("plus", &[same]),
            Err(EvaluationError::ObjectInUse { type_name }) if type_name == "Counter"
        ));
        assert_eq!(counter.get_property("value").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_missing_members() {
        let (_, handle) = alice();

        assert!(matches!(
            handle.call_method("fly", &[]),
            Err(EvaluationError::MethodNotFound { method, .. }) if method == "fly"
        ));
        assert!(matches!(
            handle.get_property("height"),
            Err(EvaluationError::PropertyNotFound { property, .. }) if property == "height"
        ));
        assert!(matches!(
            handle.set_property("hobbies", Value::Null),
            Err(EvaluationError::PropertyNotFound { .. })
        ));
    }
}
