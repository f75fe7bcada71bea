///
/// Front-panel switch lines. The driver owns flipping these; the core only
/// samples them. Power-up matches the real panel: PURST raised, halted,
/// instruction-step granularity, manual clock, full power, scaler running.
///
#[derive(Clone, Copy, Debug)]
pub struct Mon {
    /// power up reset; initially high at startup
    pub purst: bool,
    /// run/halt switch
    pub run: bool,
    /// single step switch
    pub step: bool,
    /// instruction/pulse step select switch
    pub inst: bool,
    /// fast clock enable
    pub fclk: bool,
    /// "standby allowed"; false=NO (full power), true=YES (low power)
    pub sa: bool,
    /// "scaler enabled"; false=NO (scaler halted), true=YES (running)
    pub scl_enab: bool,
}

impl Default for Mon {
    fn default() -> Mon {
        Mon {
            purst: true,
            run: false,
            step: false,
            inst: true,
            fclk: false,
            sa: false,
            scl_enab: true,
        }
    }
}
