use std::ffi::c_void;
use thiserror::Error;

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

pub struct GeometryBuilder<'a> {
    attributes: Vec<(u32, VertexAttribute)>,
    layout: Layout,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            layout: Layout::Interleaved,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute at the next sequential location.
    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        let location = self.attributes.len() as u32;
        self.attributes.push((location, attr));
        self
    }

    /// Adds an attribute at a location queried from a linked program.
    pub fn with_attribute_at(mut self, location: u32, attr: VertexAttribute) -> Self {
        self.attributes.push((location, attr));
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Offsets and strides `build` will hand to GL, without touching GL.
    pub fn vertex_layout(&self) -> Result<VertexLayout, GBError> {
        let kinds = self.attributes.iter().map(|(_, a)| *a).collect::<Vec<_>>();

        VertexLayout::new(&kinds, self.data.len(), self.layout)
    }

    pub fn locations(&self) -> Vec<u32> {
        self.attributes.iter().map(|(l, _)| *l).collect()
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let layout = self.vertex_layout()?;

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.data.len() * FLOAT_SIZE) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            for ((location, attr), pointer) in self.attributes.iter().zip(layout.pointers()) {
                gl::VertexAttribPointer(
                    *location,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    pointer.stride as i32,
                    pointer.offset as *const c_void,
                );
                gl::EnableVertexAttribArray(*location);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        log::debug!(
            "uploaded {} bytes ({} vertices, {:?}) to buffer {vbo}",
            self.data.len() * FLOAT_SIZE,
            layout.vertices,
            self.layout
        );

        Ok(Geometry {
            vao,
            vbo,
            vertices: layout.vertices,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
            VertexAttribute::Vec4 => 4,
        }
    }
}

/// How attribute values are arranged in the buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// All attributes of vertex 0, then vertex 1, ...
    Interleaved,
    /// All values of attribute 0, then all values of attribute 1, ...
    Planar,
}

/// Byte stride and offset handed to `glVertexAttribPointer`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttributePointer {
    pub stride: usize,
    pub offset: usize,
}

#[derive(Debug)]
pub struct VertexLayout {
    pointers: Vec<AttributePointer>,
    vertices: usize,
}

impl VertexLayout {
    pub fn new(
        attributes: &[VertexAttribute],
        data_len: usize,
        layout: Layout,
    ) -> Result<Self, GBError> {
        let total_len: usize = attributes.iter().map(|a| a.size()).sum();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if data_len % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = data_len / total_len;
        let mut offset = 0;

        let pointers = attributes
            .iter()
            .map(|attr| match layout {
                Layout::Interleaved => {
                    let pointer = AttributePointer {
                        stride: total_len * FLOAT_SIZE,
                        offset: offset * FLOAT_SIZE,
                    };
                    offset += attr.size();
                    pointer
                }
                Layout::Planar => {
                    // tightly packed region, GL derives the stride from the size
                    let pointer = AttributePointer {
                        stride: 0,
                        offset: offset * FLOAT_SIZE,
                    };
                    offset += attr.size() * vertices;
                    pointer
                }
            })
            .collect();

        Ok(Self { pointers, vertices })
    }

    pub fn pointers(&self) -> &[AttributePointer] {
        &self.pointers
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    vertices: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }
    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
