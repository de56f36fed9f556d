mod convert;

pub use convert::{
    axis_correction, backend_position_to_render, backend_rotation_to_render,
    backend_size_to_render, backend_to_render, backend_yaw, render_position_to_backend,
    render_rotation_to_backend, render_size_to_backend, render_to_backend, render_yaw,
};
