use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, SPRITE_HEIGHT, SPRITE_SHEET_START};
use crate::error::VmError;
use crate::opcode::Opcode;
use crate::state::{Keypad, Mode, State};

// The pc has already been moved past the opcode when these run, so skipping the next
// instruction is a single extra step of 2.

fn skip_if(state: &State, condition: bool) -> State {
    let pc = if condition { state.pc + 0x2 } else { state.pc };
    State { pc, ..*state }
}

/// Writes the result and then the flag; VF holds the flag when x is F.
fn result_then_flag(state: &State, x: u8, res: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x as usize] = res;
    v[FLAG] = u8::from(flag);
    State { v, ..*state }
}

/// Writes the flag, then computes the result from the registers as they now stand; when x or y
/// is F the result is worked out from the new flag.
fn flag_then_result(
    state: &State,
    x: u8,
    flag: bool,
    result: impl Fn(&[u8; 16]) -> u8,
) -> State {
    let mut v = state.v;
    v[FLAG] = u8::from(flag);
    v[x as usize] = result(&v);
    State { v, ..*state }
}

fn key(keys: &Keypad, value: u8) -> bool {
    keys[(value & 0xF) as usize]
}

/// no-op; for opcodes that don't match an instruction
pub fn nop(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    log::debug!("skipping unknown opcode {:X?}", op.nibbles());
    Ok(*state)
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut next = *state;
    next.pc = next.pop()?;
    Ok(next)
}

/// PC = nnn
pub fn jump(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut next = *state;
    next.push(state.pc)?;
    next.pc = op.nnn();
    Ok(next)
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(state, state.v[op.x() as usize] == op.nn()))
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(state, state.v[op.x() as usize] != op.nn()))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(
        state,
        state.v[op.x() as usize] == state.v[op.y() as usize],
    ))
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = op.nn();
    Ok(State { v, ..*state })
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.nn());
    Ok(State { v, ..*state })
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    Ok(State { v, ..*state })
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] |= v[op.y() as usize];
    Ok(State { v, ..*state })
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    Ok(State { v, ..*state })
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] ^= v[op.y() as usize];
    Ok(State { v, ..*state })
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let (res, over) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    Ok(result_then_flag(state, op.x(), res, over))
}

/// VF = !borrow; Vx -= Vy
pub fn sub(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let (x, y) = (op.x() as usize, op.y() as usize);
    let borrow = state.v[y] > state.v[x];
    Ok(flag_then_result(state, op.x(), !borrow, |v| v[x].wrapping_sub(v[y])))
}

/// VF = shifted out bit; Vx >>= 1
pub fn shr(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let x = op.x() as usize;
    Ok(flag_then_result(state, op.x(), state.v[x] & 0x1 == 0x1, |v| v[x] >> 1))
}

/// VF = !borrow; Vx = Vy - Vx
pub fn subn(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let (x, y) = (op.x() as usize, op.y() as usize);
    let borrow = state.v[x] > state.v[y];
    Ok(flag_then_result(state, op.x(), !borrow, |v| v[y].wrapping_sub(v[x])))
}

/// VF = Vx & 1; Vx <<= 1
/// The flag is the low bit of the value before the shift, not the bit shifted out
pub fn shl(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let x = op.x() as usize;
    Ok(flag_then_result(state, op.x(), state.v[x] & 0x1 == 0x1, |v| v[x] << 1))
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(
        state,
        state.v[op.x() as usize] != state.v[op.y() as usize],
    ))
}

/// I = nnn
pub fn loadi(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        i: op.nnn(),
        ..*state
    })
}

/// PC = V0 + nnn
/// Not masked; a pc past the end of memory is reported by the next fetch
pub fn jumpi(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn(),
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[op.x() as usize] = rand_byte & op.nn();
    Ok(State { v, ..*state })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// The origin wraps but the sprite itself is clipped at the right and bottom edges.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    let x = state.v[op.x() as usize] as usize % DISPLAY_WIDTH;
    let y = state.v[op.y() as usize] as usize % DISPLAY_HEIGHT;

    // Reset the flag (used for collision detection)
    v[FLAG] = 0x0;

    for row in 0..op.n() as usize {
        if y + row >= DISPLAY_HEIGHT {
            break;
        }
        let sprite_row = state.read(state.i as usize + row)?;
        for bit in 0..8 {
            if x + bit >= DISPLAY_WIDTH {
                break;
            }
            if (sprite_row >> (7 - bit)) & 0x1 == 0x1 {
                let pixel = &mut frame_buffer[y + row][x + bit];
                if *pixel {
                    v[FLAG] = 0x1;
                }
                *pixel = !*pixel;
            }
        }
    }

    Ok(State {
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(state, key(keys, state.v[op.x() as usize])))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, keys: &Keypad) -> Result<State, VmError> {
    Ok(skip_if(state, !key(keys, state.v[op.x() as usize])))
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State { v, ..*state })
}

/// await keypress for Vx
/// Takes the lowest pressed key if there is one, otherwise parks the pc on this opcode and
/// blocks until the key is delivered by the cycle driver
pub fn keyd(op: &dyn Opcode, state: &State, keys: &Keypad) -> Result<State, VmError> {
    match keys.iter().position(|&pressed| pressed) {
        Some(pressed) => {
            let mut v = state.v;
            v[op.x() as usize] = pressed as u8;
            Ok(State { v, ..*state })
        }
        None => {
            log::debug!("awaiting key for V{:X}", op.x());
            Ok(State {
                pc: state.pc - 0x2,
                mode: Mode::AwaitingKey(op.x()),
                ..*state
            })
        }
    }
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        delay_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        sound_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// I += Vx
/// Wraps within the 12-bit address space
pub fn addi(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    Ok(State {
        i: state.i.wrapping_add(u16::from(state.v[op.x() as usize])) & 0x0FFF,
        ..*state
    })
}

/// I = SPRITE_SHEET_START + (Vx & 0xF) * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let digit = u16::from(state.v[op.x() as usize] & 0xF);
    Ok(State {
        i: SPRITE_SHEET_START + digit * SPRITE_HEIGHT,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let vx = state.v[op.x() as usize];
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    let mut next = *state;
    next.write_slice(state.i as usize, &bcd)?;
    Ok(next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let mut next = *state;
    next.write_slice(state.i as usize, &state.v[..=op.x() as usize])?;
    Ok(next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &State, _keys: &Keypad) -> Result<State, VmError> {
    let count = op.x() as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.read_slice(state.i as usize, count)?);
    Ok(State { v, ..*state })
}
