#![no_main]
#![no_std]

use panic_rtt_target as _;
use rtic::app;

#[app(device = stm32f4xx_hal::pac, peripherals = true)]
mod app {
    use paralight::{config, ChannelReader, ChannelState, Decoder, Dispatcher, PulseTimer};
    use rtt_target::{rprintln, rtt_init_print};
    use stm32f4xx_hal::{
        gpio::*, pac::*, prelude::*, timer::Timer, watchdog::IndependentWatchdog,
    };

    const CLOCK_FREQ_HZ: u32 = 48_000_000;

    /// TIM4 as the pulse timer. Counts at `PULSE_TIMER_HZ` and raises its
    /// update interrupt when the count passes 255.
    pub struct PulseCounter(TIM4);

    impl PulseTimer for PulseCounter {
        fn start(&mut self) {
            self.0.cr1.modify(|_, w| w.cen().set_bit());
        }

        fn stop(&mut self) {
            self.0.cr1.modify(|_, w| w.cen().clear_bit());
        }

        fn count(&self) -> u8 {
            // ARR is 255, so the count always fits.
            self.0.cnt.read().cnt().bits() as u8
        }

        fn reset(&mut self) {
            self.0.cnt.reset();
        }

        fn acknowledge_overflow(&mut self) {
            self.0.sr.modify(|_, w| w.uif().clear_bit());
        }
    }

    #[shared]
    struct Shared {
        decoder: Decoder<'static, PulseCounter>,
    }

    #[local]
    struct Local {
        rc_input: Pin<'A', 0, Input>,
        light: Pin<'B', 3, Output<PushPull>>,
        fault_led: Pin<'C', 13, Output<PushPull>>,
        reader: ChannelReader<'static>,
        watchdog: IndependentWatchdog,
    }

    #[init(local = [channel: ChannelState = ChannelState::new()])]
    fn init(mut ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        rtt_init_print!();
        rprintln!("paralight running");

        let rcc = ctx.device.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(CLOCK_FREQ_HZ.Hz()).freeze();

        // GPIO pins. Outputs come up high: light on, fault LED off (it is
        // inverted in hardware), spare line parked high.
        let gpioa = ctx.device.GPIOA.split();
        let gpiob = ctx.device.GPIOB.split();
        let gpioc = ctx.device.GPIOC.split();
        let mut rc_input = gpioa.pa0.into_pull_up_input();
        let _spare = gpiob.pb4.into_push_pull_output_in_state(PinState::High);

        // Configure TIM4 as a free-running up-counter with an 8-bit range.
        // Use the HAL to enable and reset, then release for manual register config.
        let timer = Timer::new(ctx.device.TIM4, &clocks).release();
        let prescaler = config::pulse_timer_prescaler(clocks.pclk1().raw(), clocks.ppre1());
        timer.psc.write(|w| w.psc().bits(prescaler));
        timer.arr.write(|w| w.arr().bits(u8::MAX.into()));
        // Only counter overflow raises the update interrupt, not the UG below.
        timer.cr1.write(|w| w.urs().set_bit());
        timer.egr.write(|w| w.ug().set_bit());
        timer.cnt.reset();
        timer.dier.write(|w| w.uie().set_bit());

        // Enable edge-triggered interrupt for the receiver input, both edges.
        rc_input.make_interrupt_source(&mut ctx.device.SYSCFG.constrain());
        rc_input.enable_interrupt(&mut ctx.device.EXTI);
        rc_input.trigger_on_edge(&mut ctx.device.EXTI, Edge::RisingFalling);

        let mut watchdog = IndependentWatchdog::new(ctx.device.IWDG);
        watchdog.start(config::WATCHDOG_TIMEOUT_MS.millis());

        let (writer, reader) = ctx.local.channel.split();

        (
            Shared {
                decoder: Decoder::new(PulseCounter(timer), writer),
            },
            Local {
                rc_input,
                light: gpiob.pb3.into_push_pull_output_in_state(PinState::High),
                fault_led: gpioc.pc13.into_push_pull_output_in_state(PinState::High),
                reader,
                watchdog,
            },
            init::Monotonics(),
        )
    }

    #[idle(local = [reader, watchdog, light, fault_led])]
    fn idle(ctx: idle::Context) -> ! {
        let mut dispatcher = Dispatcher::new();
        let mut fault = false;
        loop {
            ctx.local.watchdog.feed();

            let snapshot = ctx.local.reader.snapshot();
            let previous_mode = dispatcher.mode();
            let outputs = dispatcher.step(&snapshot);

            match dispatcher.mode() {
                Some(mode) if Some(mode) != previous_mode => {
                    rprintln!("mode {:?} ({})", mode, snapshot.value)
                }
                _ => {}
            }
            match (fault, snapshot.error()) {
                (false, Some(error)) => rprintln!("fault: {}", error),
                (true, None) => rprintln!("fault cleared"),
                _ => {}
            }
            fault = snapshot.fault;

            ctx.local.light.set_state(PinState::from(outputs.light));
            // LED inverted in hardware
            ctx.local
                .fault_led
                .set_state(PinState::from(!outputs.fault_indicator));
        }
    }

    #[task(binds = EXTI0, shared = [decoder], local = [rc_input])]
    fn on_exti(mut ctx: on_exti::Context) {
        ctx.local.rc_input.clear_interrupt_pending_bit();
        ctx.shared.decoder.lock(|decoder| decoder.on_edge());
    }

    // Same priority as `on_exti`, so the two never preempt each other.
    #[task(binds = TIM4, shared = [decoder])]
    fn on_overflow(mut ctx: on_overflow::Context) {
        ctx.shared.decoder.lock(|decoder| decoder.on_timeout());
    }
}
