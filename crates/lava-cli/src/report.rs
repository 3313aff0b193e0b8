//! What gets printed after a class is loaded

use lava_classfile::ClassFile;
use lava_vm_core::{Ident, IdentVariant};
use lava_vm_heap::{Heap, HeapStats, Ref};
use serde::Serialize;

/// Summary of one compiled class
#[derive(Debug, Serialize)]
pub struct Report {
    pub class: String,
    pub version: String,
    pub table: Ref,
    pub stats: HeapStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<Vec<PoolEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<TableEntry>>,
}

/// One constant pool row
#[derive(Debug, Serialize)]
pub struct PoolEntry {
    pub index: u16,
    pub kind: &'static str,
    pub text: String,
}

/// One class table row
#[derive(Debug, Serialize)]
pub struct TableEntry {
    pub key: Ident,
    pub name: String,
    pub value: Ref,
    pub tag: String,
}

impl Report {
    pub fn new(class: &ClassFile, heap: &Heap, table: Ref, dump_pool: bool, dump_heap: bool) -> Self {
        let pool = dump_pool.then(|| {
            class
                .constant_pool
                .iter()
                .map(|(index, constant)| PoolEntry {
                    index,
                    kind: constant.kind(),
                    text: class.constant_pool.describe(index),
                })
                .collect()
        });

        let entries = dump_heap.then(|| {
            heap.table_entries(table)
                .into_iter()
                .map(|(key, value)| TableEntry {
                    key,
                    name: key.to_name(IdentVariant::Primary),
                    value,
                    tag: if value.is_nil() {
                        "nil".to_owned()
                    } else {
                        heap.type_of(value).to_name(IdentVariant::Primary)
                    },
                })
                .collect()
        });

        Self {
            class: class.class_name().unwrap_or("?").to_owned(),
            version: format!("{}.{}", class.major_version, class.minor_version),
            table,
            stats: heap.stats(),
            pool,
            entries,
        }
    }

    /// Human readable form
    pub fn render(&self) -> String {
        let mut out = format!(
            "class {} (version {})\ntable {}\nheap {}/{} words, {} objects\n",
            self.class,
            self.version,
            self.table,
            self.stats.used,
            self.stats.capacity,
            self.stats.objects
        );

        if let Some(pool) = &self.pool {
            out.push_str("\nconstant pool:\n");
            for entry in pool {
                out.push_str(&format!("  #{:<4} {:<18} {}\n", entry.index, entry.kind, entry.text));
            }
        }

        if let Some(entries) = &self.entries {
            out.push_str("\nclass table:\n");
            for entry in entries {
                out.push_str(&format!(
                    "  {} {:<4} -> {:<6} {}\n",
                    entry.key, entry.name, entry.value, entry.tag
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lava_classfile::{AccessFlags, Constant, ConstantPool, MemberInfo};
    use lava_vm_compiler::ClassCompiler;
    use lava_vm_core::symbols::INTG;

    fn sample() -> ClassFile {
        let mut pool = ConstantPool::new();
        let this = pool.push_class("Hello");
        pool.push(Constant::Integer(42));
        ClassFile {
            minor_version: 0,
            major_version: 52,
            constant_pool: pool,
            access_flags: AccessFlags(AccessFlags::ACC_PUBLIC),
            this_class: this,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_plain_report() {
        let class = sample();
        let mut heap = Heap::default();
        let table = ClassCompiler::new(&mut heap).compile(&class);

        let report = Report::new(&class, &heap, table, false, false);
        assert_eq!(report.class, "Hello");
        assert_eq!(report.version, "52.0");
        assert!(report.pool.is_none());

        let text = report.render();
        assert!(text.starts_with("class Hello (version 52.0)\n"));
        assert!(!text.contains("constant pool:"));
    }

    #[test]
    fn test_dumps() {
        let class = sample();
        let mut heap = Heap::default();
        let table = ClassCompiler::new(&mut heap).compile(&class);

        let report = Report::new(&class, &heap, table, true, true);
        let pool = report.pool.as_ref().unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[2].kind, "Integer");

        let entries = report.entries.as_ref().unwrap();
        // class name, the Class constant and the Integer constant
        assert_eq!(entries.len(), 3);
        let int_tag = INTG.to_name(IdentVariant::Primary);
        assert!(entries.iter().any(|e| e.tag == int_tag));

        let text = report.render();
        assert!(text.contains("constant pool:"));
        assert!(text.contains("class table:"));
    }

    #[test]
    fn test_nil_static_field_dumped_as_nil() {
        let mut class = sample();
        class.fields.push(MemberInfo::new(
            AccessFlags::ACC_PUBLIC | AccessFlags::ACC_STATIC,
            "count",
            "I",
        ));
        let mut heap = Heap::default();
        let table = ClassCompiler::new(&mut heap).compile(&class);

        let report = Report::new(&class, &heap, table, false, true);
        let entries = report.entries.as_ref().unwrap();
        let field = entries
            .iter()
            .find(|e| e.key == Ident::from_name("count"))
            .unwrap();
        assert_eq!(field.value, Ref::NIL);
        assert_eq!(field.tag, "nil");
    }

    #[test]
    fn test_json_skips_missing_dumps() {
        let class = sample();
        let mut heap = Heap::default();
        let table = ClassCompiler::new(&mut heap).compile(&class);

        let json = serde_json::to_value(Report::new(&class, &heap, table, false, false)).unwrap();
        assert_eq!(json["class"], "Hello");
        assert!(json.get("pool").is_none());
        assert!(json["stats"]["used"].as_u64().unwrap() > 1);
    }
}
