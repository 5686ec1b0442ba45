// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::bail;
use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::type_registry::TypeRegistry;
use crate::resolver::type_resolver::{TypeIdReader, TypeIdWriter};
use crate::types::Kind;

/// Static type of a value slot.
///
/// On the wire a descriptor is its [`Kind`] byte followed by the nested
/// descriptors of map keys/values, pointer targets and slice elements, or
/// by the stream-local id of a struct or interface name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    UintPtr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    /// Fixed-size array. Describable, never encodable.
    Array {
        elem: Box<TypeDescriptor>,
        len: usize,
    },
    /// Channel. Describable, never encodable.
    Chan(Box<TypeDescriptor>),
    /// Function. Describable, never encodable.
    Func,
    /// Named interface: the slot holds any concrete value, or nil.
    Interface(Arc<str>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Pointer(Box<TypeDescriptor>),
    Slice(Box<TypeDescriptor>),
    /// Named struct registered in the [`TypeRegistry`].
    Struct(Arc<str>),
}

impl TypeDescriptor {
    pub fn slice_of(elem: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Slice(Box::new(elem))
    }

    pub fn map_of(key: TypeDescriptor, elem: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Map(Box::new(key), Box::new(elem))
    }

    pub fn pointer_to(target: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Pointer(Box::new(target))
    }

    pub fn array_of(elem: TypeDescriptor, len: usize) -> TypeDescriptor {
        TypeDescriptor::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn chan_of(elem: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Chan(Box::new(elem))
    }

    pub fn struct_named(name: impl Into<Arc<str>>) -> TypeDescriptor {
        TypeDescriptor::Struct(name.into())
    }

    pub fn interface_named(name: impl Into<Arc<str>>) -> TypeDescriptor {
        TypeDescriptor::Interface(name.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            TypeDescriptor::Bool => Kind::Bool,
            TypeDescriptor::Int => Kind::Int,
            TypeDescriptor::Int8 => Kind::Int8,
            TypeDescriptor::Int16 => Kind::Int16,
            TypeDescriptor::Int32 => Kind::Int32,
            TypeDescriptor::Int64 => Kind::Int64,
            TypeDescriptor::Uint => Kind::Uint,
            TypeDescriptor::Uint8 => Kind::Uint8,
            TypeDescriptor::Uint16 => Kind::Uint16,
            TypeDescriptor::Uint32 => Kind::Uint32,
            TypeDescriptor::Uint64 => Kind::Uint64,
            TypeDescriptor::UintPtr => Kind::UintPtr,
            TypeDescriptor::Float32 => Kind::Float32,
            TypeDescriptor::Float64 => Kind::Float64,
            TypeDescriptor::Complex64 => Kind::Complex64,
            TypeDescriptor::Complex128 => Kind::Complex128,
            TypeDescriptor::String => Kind::String,
            TypeDescriptor::Array { .. } => Kind::Array,
            TypeDescriptor::Chan(_) => Kind::Chan,
            TypeDescriptor::Func => Kind::Func,
            TypeDescriptor::Interface(_) => Kind::Interface,
            TypeDescriptor::Map(_, _) => Kind::Map,
            TypeDescriptor::Pointer(_) => Kind::Pointer,
            TypeDescriptor::Slice(_) => Kind::Slice,
            TypeDescriptor::Struct(_) => Kind::Struct,
        }
    }

    #[inline(always)]
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeDescriptor::Interface(_))
    }

    /// Registered name of a struct or interface descriptor.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Struct(name) | TypeDescriptor::Interface(name) => Some(name),
            _ => None,
        }
    }

    /// Writes the type tag, assigning stream-local ids to the struct and
    /// interface names it mentions.
    pub fn write_tag(
        &self,
        writer: &mut Writer,
        type_ids: &mut TypeIdWriter,
        registry: &TypeRegistry,
    ) -> Result<(), Error> {
        let kind = self.kind();
        if kind.is_unsupported() {
            return Err(Error::unsupported_type(kind.name()));
        }
        writer.write_u8(kind.into());
        match self {
            TypeDescriptor::Map(key, elem) => {
                key.write_tag(writer, type_ids, registry)?;
                elem.write_tag(writer, type_ids, registry)
            }
            TypeDescriptor::Pointer(elem) | TypeDescriptor::Slice(elem) => {
                elem.write_tag(writer, type_ids, registry)
            }
            TypeDescriptor::Struct(name) => {
                let id = type_ids.register(name, false, registry)?;
                writer.write_uint(id);
                Ok(())
            }
            TypeDescriptor::Interface(name) => {
                let id = type_ids.register(name, true, registry)?;
                writer.write_uint(id);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Reads a type tag in a position where nil is not allowed.
    pub fn read_tag<R: Read>(
        reader: &mut Reader<R>,
        types: &TypeIdReader,
        max_depth: u32,
    ) -> Result<TypeDescriptor, Error> {
        match Self::read_interface_tag(reader, types, max_depth)? {
            Some(descriptor) => Ok(descriptor),
            None => bail!(
                "nil type tag outside an interface slot at byte {}",
                reader.get_cursor() - 1
            ),
        }
    }

    /// Reads the concrete type tag of an interface slot; `None` means nil.
    pub fn read_interface_tag<R: Read>(
        reader: &mut Reader<R>,
        types: &TypeIdReader,
        max_depth: u32,
    ) -> Result<Option<TypeDescriptor>, Error> {
        let byte = reader.read_u8()?;
        let kind = Kind::try_from(byte)
            .map_err(|_| Error::invalid_data(format!("unknown kind tag {}", byte)))?;
        let nested = |reader: &mut Reader<R>| -> Result<Box<TypeDescriptor>, Error> {
            if max_depth == 0 {
                return Err(Error::depth_exceed("type tag nests too deeply"));
            }
            Self::read_tag(reader, types, max_depth - 1).map(Box::new)
        };
        let descriptor = match kind {
            Kind::Invalid => return Ok(None),
            Kind::Array | Kind::Chan | Kind::Func => {
                return Err(Error::unsupported_type(kind.name()))
            }
            Kind::Bool => TypeDescriptor::Bool,
            Kind::Int => TypeDescriptor::Int,
            Kind::Int8 => TypeDescriptor::Int8,
            Kind::Int16 => TypeDescriptor::Int16,
            Kind::Int32 => TypeDescriptor::Int32,
            Kind::Int64 => TypeDescriptor::Int64,
            Kind::Uint => TypeDescriptor::Uint,
            Kind::Uint8 => TypeDescriptor::Uint8,
            Kind::Uint16 => TypeDescriptor::Uint16,
            Kind::Uint32 => TypeDescriptor::Uint32,
            Kind::Uint64 => TypeDescriptor::Uint64,
            Kind::UintPtr => TypeDescriptor::UintPtr,
            Kind::Float32 => TypeDescriptor::Float32,
            Kind::Float64 => TypeDescriptor::Float64,
            Kind::Complex64 => TypeDescriptor::Complex64,
            Kind::Complex128 => TypeDescriptor::Complex128,
            Kind::String => TypeDescriptor::String,
            Kind::Map => {
                let key = nested(reader)?;
                let elem = nested(reader)?;
                TypeDescriptor::Map(key, elem)
            }
            Kind::Pointer => TypeDescriptor::Pointer(nested(reader)?),
            Kind::Slice => TypeDescriptor::Slice(nested(reader)?),
            Kind::Struct | Kind::Interface => {
                let id = reader.read_uint()?;
                let (name, is_interface) = types.resolve(id)?;
                if is_interface != (kind == Kind::Interface) {
                    return Err(Error::invalid_data(format!(
                        "type id {} names {}, but the tag says {}",
                        id,
                        name,
                        kind.name()
                    )));
                }
                if is_interface {
                    TypeDescriptor::Interface(name)
                } else {
                    TypeDescriptor::Struct(name)
                }
            }
        };
        Ok(Some(descriptor))
    }
}

/// Tag of a nil interface value.
#[inline(always)]
pub fn write_nil_tag(writer: &mut Writer) {
    writer.write_u8(Kind::Invalid.into());
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Array { elem, len } => write!(f, "[{}]{}", len, elem),
            TypeDescriptor::Chan(elem) => write!(f, "chan {}", elem),
            TypeDescriptor::Func => f.write_str("func()"),
            TypeDescriptor::Map(key, elem) => write!(f, "map[{}]{}", key, elem),
            TypeDescriptor::Pointer(elem) => write!(f, "*{}", elem),
            TypeDescriptor::Slice(elem) => write!(f, "[]{}", elem),
            TypeDescriptor::Struct(name) | TypeDescriptor::Interface(name) => f.write_str(name),
            scalar => f.write_str(scalar.kind().name()),
        }
    }
}

/// One field of a registered struct.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape {
    name: String,
    descriptor: TypeDescriptor,
    exported: bool,
}

impl FieldShape {
    /// A field that is carried on the wire.
    pub fn exported(name: impl Into<String>, descriptor: TypeDescriptor) -> FieldShape {
        FieldShape {
            name: name.into(),
            descriptor,
            exported: true,
        }
    }

    /// A field that is skipped on encode and left at its zero value on decode.
    pub fn unexported(name: impl Into<String>, descriptor: TypeDescriptor) -> FieldShape {
        FieldShape {
            name: name.into(),
            descriptor,
            exported: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// Ordered field list of a registered struct.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructShape {
    fields: Vec<FieldShape>,
}

impl StructShape {
    pub fn new() -> StructShape {
        StructShape::default()
    }

    pub fn with_field(mut self, field: FieldShape) -> StructShape {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn exported_fields(&self) -> impl Iterator<Item = &FieldShape> {
        self.fields.iter().filter(|f| f.exported)
    }

    pub fn exported_count(&self) -> usize {
        self.exported_fields().count()
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }
}
