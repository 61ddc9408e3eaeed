pub(crate) trait BitsExt {
    fn set(self, shift: u8) -> Self;
    fn set_if(self, shift: u8, on: bool) -> Self;
}

impl BitsExt for u8 {
    #[inline(always)]
    fn set(self, shift: u8) -> Self {
        self | (1 << shift)
    }

    #[inline(always)]
    fn set_if(self, shift: u8, on: bool) -> Self {
        if on {
            self.set(shift)
        } else {
            self
        }
    }
}
