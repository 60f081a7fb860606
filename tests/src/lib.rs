
mod bvh;
mod environment;
mod integrators;
