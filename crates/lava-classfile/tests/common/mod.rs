//! Writes class file bytes for tests

#![allow(dead_code)]

/// Builds a class file one constant and member at a time
pub struct ClassWriter {
    pool: Vec<u8>,
    pool_count: u16,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<u8>,
    attribute_count: u16,
}

impl Default for ClassWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassWriter {
    pub fn new() -> Self {
        Self {
            pool: Vec::new(),
            pool_count: 1,
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            attribute_count: 0,
        }
    }

    fn entry(&mut self, bytes: &[u8], slots: u16) -> u16 {
        let index = self.pool_count;
        self.pool.extend_from_slice(bytes);
        self.pool_count += slots;
        index
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&(text.len() as u16).to_be_bytes());
        bytes.extend_from_slice(text.as_bytes());
        self.entry(&bytes, 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut bytes = vec![3];
        bytes.extend_from_slice(&value.to_be_bytes());
        self.entry(&bytes, 1)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        let mut bytes = vec![4];
        bytes.extend_from_slice(&value.to_bits().to_be_bytes());
        self.entry(&bytes, 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        let mut bytes = vec![5];
        bytes.extend_from_slice(&value.to_be_bytes());
        self.entry(&bytes, 2)
    }

    fn indexed(&mut self, tag: u8, a: u16) -> u16 {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&a.to_be_bytes());
        self.entry(&bytes, 1)
    }

    fn pair(&mut self, tag: u8, a: u16, b: u16) -> u16 {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&a.to_be_bytes());
        bytes.extend_from_slice(&b.to_be_bytes());
        self.entry(&bytes, 1)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        self.indexed(7, name)
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let text = self.utf8(text);
        self.indexed(8, text)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.pair(12, name, descriptor)
    }

    pub fn field_ref(&mut self, class: u16, name: &str, descriptor: &str) -> u16 {
        let nat = self.name_and_type(name, descriptor);
        self.pair(9, class, nat)
    }

    pub fn method_ref(&mut self, class: u16, name: &str, descriptor: &str) -> u16 {
        let nat = self.name_and_type(name, descriptor);
        self.pair(10, class, nat)
    }

    /// Raw attribute bytes: name index, length, body
    pub fn attribute(&mut self, name: &str, body: &[u8]) -> Vec<u8> {
        let name = self.utf8(name);
        let mut bytes = name.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    pub fn code_attribute(&mut self, code: &[u8]) -> Vec<u8> {
        let mut body = vec![0, 4, 0, 4];
        body.extend_from_slice(&(code.len() as u32).to_be_bytes());
        body.extend_from_slice(code);
        body.extend_from_slice(&[0, 0, 0, 0]);
        self.attribute("Code", &body)
    }

    fn member(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&flags.to_be_bytes());
        bytes.extend_from_slice(&name.to_be_bytes());
        bytes.extend_from_slice(&descriptor.to_be_bytes());
        bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        for attr in attributes {
            bytes.extend_from_slice(attr);
        }
        bytes
    }

    pub fn field(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) {
        let field = self.member(flags, name, descriptor, attributes);
        self.fields.push(field);
    }

    pub fn method(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) {
        let method = self.member(flags, name, descriptor, attributes);
        self.methods.push(method);
    }

    pub fn class_attribute(&mut self, name: &str, body: &[u8]) {
        let attr = self.attribute(name, body);
        self.attributes.extend_from_slice(&attr);
        self.attribute_count += 1;
    }

    pub fn finish(&self, this_class: u16, super_class: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&self.pool_count.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        for members in [&self.fields, &self.methods] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                out.extend_from_slice(member);
            }
        }
        out.extend_from_slice(&self.attribute_count.to_be_bytes());
        out.extend_from_slice(&self.attributes);
        out
    }
}
