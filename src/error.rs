// Crate error type. Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the buffer to the window failed

    #[error("Camera open error: {0}")]
    CameraOpen(String), // No camera answered, or the backend is unavailable

    #[error("Camera read error: {0}")]
    CameraRead(String), // The SDK refused a pixel read

    #[error("Console error: {0}")]
    Console(#[from] std::io::Error), // Writing startup diagnostics failed

    #[error("Sample buffer too small: need {needed} samples, have {got}")]
    BufferTooSmall { needed: usize, got: usize },
}
