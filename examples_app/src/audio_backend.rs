use crate::to_adc_code;
use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait};
use specbar_core::config::SAMPLE_COUNT;
use specbar_core::core::acquisition::AcquisitionWriter;

/// Opens the default input device and streams its first channel into `writer`.
///
/// The stream callback plays the role of the ADC DMA: it converts each frame to
/// a 12-bit code and pushes it, chaining from buffer A to B without waiting for
/// the pipeline. Returns the stream and its sample rate.
pub fn init_capture(writer: AcquisitionWriter<SAMPLE_COUNT>) -> Result<(cpal::Stream, f32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow::anyhow!("No input device available"))?;
    let config = device.default_input_config()?;
    let sample_rate = config.sample_rate() as f32;

    log::info!(
        "capturing from default input at {} Hz, {} channel(s), {:?}",
        sample_rate,
        config.channels(),
        config.sample_format()
    );

    let err_fn = |err| log::error!("an error occurred on stream: {}", err);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_capture::<f32>(&device, &config.into(), writer, err_fn)?,
        cpal::SampleFormat::I16 => run_capture::<i16>(&device, &config.into(), writer, err_fn)?,
        cpal::SampleFormat::U16 => run_capture::<u16>(&device, &config.into(), writer, err_fn)?,
        _ => return Err(anyhow::anyhow!("Unsupported sample format")),
    };

    Ok((stream, sample_rate))
}

fn run_capture<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut writer: AcquisitionWriter<SAMPLE_COUNT>,
    err_fn: impl FnMut(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = config.channels as usize;

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for frame in data.chunks(channels) {
                writer.push(to_adc_code(frame[0].to_sample::<f32>()));
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
