#![no_main]
#![no_std]

use ad7616_parallel::{
    bus::PinBus,
    line::{DigitalLine, LineId},
    report::Reporter,
    sequencer::{Ad7616, ControlLines, DataBuses},
    session::single_shot,
    Timing,
};
use core::convert::Infallible;
use embedded_hal::digital::InputPin;
use msp430_rt::entry;
use msp430fr2x5x_hal::{
    clock::{ClockConfig, DcoclkFreqSel, MclkDiv, SmclkDiv},
    fram::Fram,
    gpio::Batch,
    pmm::Pmm,
    serial::*,
    watchdog::Wdt,
};

#[cfg(debug_assertions)]
use panic_msp430 as _;

#[cfg(not(debug_assertions))]
use panic_never as _;

// Wiring (Launchpad, remove the P1.0 LED jumper):
//   DB0-DB7  -> P1.0-P1.7      DB8-DB15 -> P3.0-P3.7
//   BUSY     -> P2.0
//   RESET    -> P6.0           CONVST   -> P6.1
//   CS       -> P6.2           RD       -> P6.3
//   UART TX  -> P4.3 (eUSCI_A1, 115200 8N1)
#[entry]
fn main() -> ! {
    let periph = msp430fr2355::Peripherals::take().unwrap();

    let mut fram = Fram::new(periph.FRCTL);
    let _wdt = Wdt::constrain(periph.WDT_A);

    let (smclk, _aclk, delay) = ClockConfig::new(periph.CS)
        .mclk_dcoclk(DcoclkFreqSel::_8MHz, MclkDiv::_1)
        .smclk_on(SmclkDiv::_1)
        .aclk_refoclk()
        .freeze(&mut fram);

    let pmm = Pmm::new(periph.PMM);
    let p1 = Batch::new(periph.P1).split(&pmm);
    let p2 = Batch::new(periph.P2).split(&pmm);
    let p3 = Batch::new(periph.P3).split(&pmm);
    let p4 = Batch::new(periph.P4).split(&pmm);
    let p6 = Batch::new(periph.P6).split(&pmm);

    let tx = SerialConfig::new(
        periph.E_USCI_A1,
        BitOrder::LsbFirst,
        BitCount::EightBits,
        StopBits::OneStopBit,
        Parity::NoParity,
        Loopback::NoLoop,
        115200,
    )
    .use_smclk(&smclk)
    .tx_only(p4.pin3.to_alternate1());
    let mut reporter = Reporter::new(tx);

    let (mut l0, mut l1, mut l2, mut l3) = (p1.pin0, p1.pin1, p1.pin2, p1.pin3);
    let (mut l4, mut l5, mut l6, mut l7) = (p1.pin4, p1.pin5, p1.pin6, p1.pin7);
    let (mut h0, mut h1, mut h2, mut h3) = (p3.pin0, p3.pin1, p3.pin2, p3.pin3);
    let (mut h4, mut h5, mut h6, mut h7) = (p3.pin4, p3.pin5, p3.pin6, p3.pin7);
    let low: [&mut dyn InputPin<Error = Infallible>; 8] = [
        &mut l0, &mut l1, &mut l2, &mut l3, &mut l4, &mut l5, &mut l6, &mut l7,
    ];
    let high: [&mut dyn InputPin<Error = Infallible>; 8] = [
        &mut h0, &mut h1, &mut h2, &mut h3, &mut h4, &mut h5, &mut h6, &mut h7,
    ];

    let lines = ControlLines {
        reset: DigitalLine::output(LineId::Reset, p6.pin0.to_output()),
        convst: DigitalLine::output(LineId::Convst, p6.pin1.to_output()),
        chip_select: DigitalLine::output(LineId::ChipSelect, p6.pin2.to_output()),
        read_strobe: DigitalLine::output(LineId::ReadStrobe, p6.pin3.to_output()),
        busy: DigitalLine::input(LineId::Busy, p2.pin0),
    };
    let buses = DataBuses {
        low: PinBus::new(low),
        high: PinBus::new(high),
    };

    // Pin directions are fixed above, so construction cannot fail.
    if let Ok(mut adc) = Ad7616::new(lines, buses, delay, Timing::default()) {
        // Any acquisition error has already been printed.
        let _ = single_shot(&mut adc, &mut reporter);
    }

    loop {
        msp430::asm::nop();
    }
}

// The compiler will emit calls to the abort() compiler intrinsic if debug assertions are
// enabled (default for dev profile). MSP430 does not actually have meaningful abort() support
// so for now, we create our own in each application where debug assertions are present.
#[no_mangle]
extern "C" fn abort() -> ! {
    panic!();
}
