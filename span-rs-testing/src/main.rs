use bytemuck::{Pod, Zeroable};
use span_rs::{Contiguous, Span, SpanMut};

#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C, align(16))]
struct Vertex {
    position: [f32; 3],
    weight: f32,
}

#[derive(Contiguous)]
struct Mesh {
    name: String,
    #[contiguous]
    vertices: Vec<Vertex>,
}

#[derive(Contiguous)]
struct Text(#[contiguous(read_only)] String);

fn main() {
    let mut mesh = Mesh {
        name: String::from("quad"),
        vertices: vec![
            Vertex {
                position: [0.0; 3],
                weight: 1.0,
            };
            4
        ],
    };
    SpanMut::from(&mut mesh).last(2).as_mut_slice()[1].weight = 0.5;
    let vertices = Span::from(&mesh);
    let bytes = vertices.cast::<u8>();
    println!(
        "{}: {} vertices, {} bytes, last weight {}",
        mesh.name,
        vertices.len(),
        vertices.size_bytes(),
        vertices[3].weight,
    );
    println!("{bytes:?}");
    SpanMut::from(&mut mesh).first(1).cast_mut::<u8>()[0] = 0;

    let text = Text(String::from("span"));
    println!("{:?}", Span::from(&text).as_slice());
}
