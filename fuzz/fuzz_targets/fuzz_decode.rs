#![no_main]
use libfuzzer_sys::fuzz_target;
use zentexture::{ColorMode, DecodeRequest, Limits, MemoryRegion, TextureInfo};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(16 << 20),
        max_pixels: Some(1 << 20),
        ..Default::default()
    };

    // Probe and decode must never panic, with or without limits
    let _ = TextureInfo::from_bytes(data);
    let _ = DecodeRequest::new(data).decode(enough::Unstoppable);
    let Ok(texture) = DecodeRequest::new(data)
        .color_mode(ColorMode::Grayscale)
        .limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Copy must never panic either, for both memory regions
    let mut dst = vec![0u16; texture.copy_len()];
    let ram = texture.copy(&mut dst, MemoryRegion::Ram).map(|_| dst.clone());
    let vram = texture.copy(&mut dst, MemoryRegion::Vram).map(|_| dst);
    if let (Ok(ram), Ok(vram)) = (ram, vram) {
        assert_eq!(ram, vram);
    }
});
