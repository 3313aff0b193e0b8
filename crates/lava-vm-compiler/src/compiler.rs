//! Class loading into the heap

use lava_classfile::{ClassFile, Constant};
use lava_vm_core::symbols::{CLAS, CNAM, METH};
use lava_vm_core::{Ident, Num48};
use lava_vm_heap::{Heap, Ref};

use crate::lookup::synthetic_key;
use crate::translate::{descriptor_param_count, translate_code};

/// Compiles classes into a borrowed heap
pub struct ClassCompiler<'h> {
    heap: &'h mut Heap,
}

impl<'h> ClassCompiler<'h> {
    /// Create a compiler writing into `heap`
    pub fn new(heap: &'h mut Heap) -> Self {
        Self { heap }
    }

    /// The heap being written
    pub fn heap(&self) -> &Heap {
        self.heap
    }

    /// Load a class and return its class table
    pub fn compile(&mut self, class: &ClassFile) -> Ref {
        let table = self.create_class_table(class);
        self.store_class_name(class, table);
        self.load_constants(class, table);
        self.load_fields(class, table);
        self.load_methods(class, table);

        tracing::debug!(
            target: "lava::compiler",
            table = %table,
            entries = self.heap.table_entries(table).len(),
            used = self.heap.used(),
            "class compiled"
        );
        table
    }

    /// Allocate the class table: half the pool size plus three rows (one for
    /// rounding, one for the class name, one for `main`).
    pub fn create_class_table(&mut self, class: &ClassFile) -> Ref {
        let requested = class.constant_pool.size() / 2 + 3;
        tracing::debug!(target: "lava::compiler", requested, "creating class table");
        self.heap.alloc_table(CLAS, requested)
    }

    /// Store the class name under `CNAM`
    pub fn store_class_name(&mut self, class: &ClassFile, table: Ref) {
        match class.class_name() {
            Ok(name) => {
                let name_ref = self.heap.alloc_str(name);
                self.heap.put(table, CNAM, name_ref);
            }
            Err(err) => {
                tracing::error!(target: "lava::compiler", %err, "class has no readable name");
            }
        }
    }

    /// Store every string, class, int and float constant under its synthetic key
    pub fn load_constants(&mut self, class: &ClassFile, table: Ref) {
        let pool = &class.constant_pool;
        for (index, constant) in pool.iter() {
            let value = match constant {
                Constant::String { .. } => match pool.string_value(index) {
                    Ok(text) => self.heap.alloc_str(text),
                    Err(err) => {
                        tracing::error!(target: "lava::compiler", index, %err, "string constant skipped");
                        continue;
                    }
                },
                Constant::Class { .. } => match pool.class_name(index) {
                    Ok(name) => {
                        let chars: Vec<u16> = name.encode_utf16().collect();
                        self.heap.alloc_class(&chars)
                    }
                    Err(err) => {
                        tracing::error!(target: "lava::compiler", index, %err, "class constant skipped");
                        continue;
                    }
                },
                Constant::Integer(i) => self.heap.alloc_int(Num48::from_int(*i)),
                Constant::Float(f) => self.heap.alloc_float(Num48::from_float(*f)),
                _ => continue,
            };

            let key = synthetic_key(index);
            tracing::debug!(
                target: "lava::compiler",
                index,
                kind = constant.kind(),
                key = %key,
                value = %value,
                "constant stored"
            );
            self.heap.put(table, key, value);
        }
    }

    /// Bind every static field to its constant value, or to nil when it has
    /// none. Instance fields are skipped.
    pub fn load_fields(&mut self, class: &ClassFile, table: Ref) {
        for field in class.fields.iter().filter(|f| f.is_static()) {
            let key = Ident::from_name(&field.name);
            let value = match field.constant_value_index() {
                None => Ref::NIL,
                Some(index) => {
                    let value = self.heap.get(table, synthetic_key(index));
                    if value.is_nil() {
                        tracing::warn!(
                            target: "lava::compiler",
                            field = %field.name,
                            index,
                            "constant value not found in class table"
                        );
                    }
                    value
                }
            };
            tracing::debug!(target: "lava::compiler", field = %field.name, key = %key, value = %value, "static field bound");
            self.heap.put(table, key, value);
        }
    }

    /// Translate each method body and store it as a `METH` array under the
    /// method name. Abstract and native methods have no body and are skipped.
    pub fn load_methods(&mut self, class: &ClassFile, table: Ref) {
        let this_class = class.class_name().unwrap_or_default();
        for method in &class.methods {
            let Some(code) = method.code() else {
                continue;
            };
            let key = Ident::from_name(&method.name);
            let params = descriptor_param_count(&method.descriptor);
            let words = translate_code(&class.constant_pool, this_class, key, params, &code.code);
            let body = self.heap.alloc_array_from(METH, &words);
            tracing::debug!(
                target: "lava::compiler",
                method = %method.name,
                key = %key,
                params,
                words = words.len(),
                body = %body,
                "method stored"
            );
            self.heap.put(table, key, body);
        }
    }
}
