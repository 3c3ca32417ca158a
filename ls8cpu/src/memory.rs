use crate::Fault;

/// Number of addressable cells. Addresses are `0..MEMORY_SIZE`.
pub const MEMORY_SIZE: usize = 256;

/// Something the CPU can read bytes from and write bytes to.
pub trait Memory {
    fn read_byte(&mut self, address: u16) -> Result<u8, Fault>;
    fn write_byte(&mut self, address: u16, data: u8) -> Result<(), Fault>;
}

/// Plain old 256 bytes of RAM. Program, data and stack all live in here.
pub struct Ram {
    cells: [u8; MEMORY_SIZE],
}

impl Ram {
    pub fn new() -> Ram {
        Ram {
            cells: [0; MEMORY_SIZE],
        }
    }

    /// Copy `image` into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > MEMORY_SIZE {
            return Err(Fault::AddressingFault {
                address: MEMORY_SIZE as u16,
            });
        }
        self.cells[..image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn from_image(image: &[u8]) -> Result<Ram, Fault> {
        let mut ram = Ram::new();
        ram.load(image)?;
        Ok(ram)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Ram {
    fn default() -> Ram {
        Ram::new()
    }
}

impl Memory for Ram {
    fn read_byte(&mut self, address: u16) -> Result<u8, Fault> {
        self.cells
            .get(address as usize)
            .copied()
            .ok_or(Fault::AddressingFault { address })
    }
    fn write_byte(&mut self, address: u16, data: u8) -> Result<(), Fault> {
        match self.cells.get_mut(address as usize) {
            Some(cell) => {
                *cell = data;
                Ok(())
            }
            None => Err(Fault::AddressingFault { address }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_what_was_written() {
        let mut ram = Ram::new();
        ram.write_byte(0x00, 0xAB).unwrap();
        ram.write_byte(0xFF, 0xCD).unwrap();
        assert_eq!(ram.read_byte(0x00).unwrap(), 0xAB);
        assert_eq!(ram.read_byte(0xFF).unwrap(), 0xCD);
        assert_eq!(ram.read_byte(0x80).unwrap(), 0x00);
    }

    #[test]
    fn out_of_range_access_is_an_addressing_fault() {
        let mut ram = Ram::new();
        assert!(matches!(
            ram.read_byte(0x100),
            Err(Fault::AddressingFault { address: 0x100 })
        ));
        assert!(matches!(
            ram.write_byte(0xFFFF, 1),
            Err(Fault::AddressingFault { address: 0xFFFF })
        ));
    }

    #[test]
    fn load_places_image_at_zero() {
        let ram = Ram::from_image(&[1, 2, 3]).unwrap();
        assert_eq!(&ram.as_slice()[..4], &[1, 2, 3, 0]);
    }

    #[test]
    fn load_rejects_oversized_image() {
        let mut ram = Ram::new();
        assert!(ram.load(&[0u8; MEMORY_SIZE]).is_ok());
        assert!(matches!(
            ram.load(&[0u8; MEMORY_SIZE + 1]),
            Err(Fault::AddressingFault { address: 0x100 })
        ));
    }
}
