//! Remote key codes
//!
//! The TV accepts the standard Android `KeyEvent` codes. Callers usually name
//! keys by their canonical `KEYCODE_*` string, so every code carries its name
//! and can be resolved from it.

use crate::{ProtocolError, Result};
use std::fmt;
use std::str::FromStr;

macro_rules! key_codes {
    ($($variant:ident = $value:literal => $name:literal,)*) => {
        /// Android key code injected by a `RemoteKeyInject` message
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum RemoteKeyCode {
            $($variant = $value,)*
        }

        impl RemoteKeyCode {
            /// Canonical `KEYCODE_*` name
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Resolve a canonical `KEYCODE_*` name
            pub fn from_str_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    Unknown = 0 => "KEYCODE_UNKNOWN",
    SoftLeft = 1 => "KEYCODE_SOFT_LEFT",
    SoftRight = 2 => "KEYCODE_SOFT_RIGHT",
    Home = 3 => "KEYCODE_HOME",
    Back = 4 => "KEYCODE_BACK",
    Call = 5 => "KEYCODE_CALL",
    Endcall = 6 => "KEYCODE_ENDCALL",
    Num0 = 7 => "KEYCODE_0",
    Num1 = 8 => "KEYCODE_1",
    Num2 = 9 => "KEYCODE_2",
    Num3 = 10 => "KEYCODE_3",
    Num4 = 11 => "KEYCODE_4",
    Num5 = 12 => "KEYCODE_5",
    Num6 = 13 => "KEYCODE_6",
    Num7 = 14 => "KEYCODE_7",
    Num8 = 15 => "KEYCODE_8",
    Num9 = 16 => "KEYCODE_9",
    Star = 17 => "KEYCODE_STAR",
    Pound = 18 => "KEYCODE_POUND",
    DpadUp = 19 => "KEYCODE_DPAD_UP",
    DpadDown = 20 => "KEYCODE_DPAD_DOWN",
    DpadLeft = 21 => "KEYCODE_DPAD_LEFT",
    DpadRight = 22 => "KEYCODE_DPAD_RIGHT",
    DpadCenter = 23 => "KEYCODE_DPAD_CENTER",
    VolumeUp = 24 => "KEYCODE_VOLUME_UP",
    VolumeDown = 25 => "KEYCODE_VOLUME_DOWN",
    Power = 26 => "KEYCODE_POWER",
    Camera = 27 => "KEYCODE_CAMERA",
    Clear = 28 => "KEYCODE_CLEAR",
    A = 29 => "KEYCODE_A",
    B = 30 => "KEYCODE_B",
    C = 31 => "KEYCODE_C",
    D = 32 => "KEYCODE_D",
    E = 33 => "KEYCODE_E",
    F = 34 => "KEYCODE_F",
    G = 35 => "KEYCODE_G",
    H = 36 => "KEYCODE_H",
    I = 37 => "KEYCODE_I",
    J = 38 => "KEYCODE_J",
    K = 39 => "KEYCODE_K",
    L = 40 => "KEYCODE_L",
    M = 41 => "KEYCODE_M",
    N = 42 => "KEYCODE_N",
    O = 43 => "KEYCODE_O",
    P = 44 => "KEYCODE_P",
    Q = 45 => "KEYCODE_Q",
    R = 46 => "KEYCODE_R",
    S = 47 => "KEYCODE_S",
    T = 48 => "KEYCODE_T",
    U = 49 => "KEYCODE_U",
    V = 50 => "KEYCODE_V",
    W = 51 => "KEYCODE_W",
    X = 52 => "KEYCODE_X",
    Y = 53 => "KEYCODE_Y",
    Z = 54 => "KEYCODE_Z",
    Comma = 55 => "KEYCODE_COMMA",
    Period = 56 => "KEYCODE_PERIOD",
    Tab = 61 => "KEYCODE_TAB",
    Space = 62 => "KEYCODE_SPACE",
    Explorer = 64 => "KEYCODE_EXPLORER",
    Envelope = 65 => "KEYCODE_ENVELOPE",
    Enter = 66 => "KEYCODE_ENTER",
    Del = 67 => "KEYCODE_DEL",
    Menu = 82 => "KEYCODE_MENU",
    Notification = 83 => "KEYCODE_NOTIFICATION",
    Search = 84 => "KEYCODE_SEARCH",
    MediaPlayPause = 85 => "KEYCODE_MEDIA_PLAY_PAUSE",
    MediaStop = 86 => "KEYCODE_MEDIA_STOP",
    MediaNext = 87 => "KEYCODE_MEDIA_NEXT",
    MediaPrevious = 88 => "KEYCODE_MEDIA_PREVIOUS",
    MediaRewind = 89 => "KEYCODE_MEDIA_REWIND",
    MediaFastForward = 90 => "KEYCODE_MEDIA_FAST_FORWARD",
    Mute = 91 => "KEYCODE_MUTE",
    PageUp = 92 => "KEYCODE_PAGE_UP",
    PageDown = 93 => "KEYCODE_PAGE_DOWN",
    Escape = 111 => "KEYCODE_ESCAPE",
    ForwardDel = 112 => "KEYCODE_FORWARD_DEL",
    MoveHome = 122 => "KEYCODE_MOVE_HOME",
    MoveEnd = 123 => "KEYCODE_MOVE_END",
    Insert = 124 => "KEYCODE_INSERT",
    Forward = 125 => "KEYCODE_FORWARD",
    MediaPlay = 126 => "KEYCODE_MEDIA_PLAY",
    MediaPause = 127 => "KEYCODE_MEDIA_PAUSE",
    MediaClose = 128 => "KEYCODE_MEDIA_CLOSE",
    MediaEject = 129 => "KEYCODE_MEDIA_EJECT",
    MediaRecord = 130 => "KEYCODE_MEDIA_RECORD",
    F1 = 131 => "KEYCODE_F1",
    F2 = 132 => "KEYCODE_F2",
    F3 = 133 => "KEYCODE_F3",
    F4 = 134 => "KEYCODE_F4",
    F5 = 135 => "KEYCODE_F5",
    F6 = 136 => "KEYCODE_F6",
    F7 = 137 => "KEYCODE_F7",
    F8 = 138 => "KEYCODE_F8",
    F9 = 139 => "KEYCODE_F9",
    F10 = 140 => "KEYCODE_F10",
    F11 = 141 => "KEYCODE_F11",
    F12 = 142 => "KEYCODE_F12",
    VolumeMute = 164 => "KEYCODE_VOLUME_MUTE",
    Info = 165 => "KEYCODE_INFO",
    ChannelUp = 166 => "KEYCODE_CHANNEL_UP",
    ChannelDown = 167 => "KEYCODE_CHANNEL_DOWN",
    ZoomIn = 168 => "KEYCODE_ZOOM_IN",
    ZoomOut = 169 => "KEYCODE_ZOOM_OUT",
    Tv = 170 => "KEYCODE_TV",
    Window = 171 => "KEYCODE_WINDOW",
    Guide = 172 => "KEYCODE_GUIDE",
    Dvr = 173 => "KEYCODE_DVR",
    Bookmark = 174 => "KEYCODE_BOOKMARK",
    Captions = 175 => "KEYCODE_CAPTIONS",
    Settings = 176 => "KEYCODE_SETTINGS",
    TvPower = 177 => "KEYCODE_TV_POWER",
    TvInput = 178 => "KEYCODE_TV_INPUT",
    StbPower = 179 => "KEYCODE_STB_POWER",
    StbInput = 180 => "KEYCODE_STB_INPUT",
    AvrPower = 181 => "KEYCODE_AVR_POWER",
    AvrInput = 182 => "KEYCODE_AVR_INPUT",
    ProgRed = 183 => "KEYCODE_PROG_RED",
    ProgGreen = 184 => "KEYCODE_PROG_GREEN",
    ProgYellow = 185 => "KEYCODE_PROG_YELLOW",
    ProgBlue = 186 => "KEYCODE_PROG_BLUE",
    AppSwitch = 187 => "KEYCODE_APP_SWITCH",
    LanguageSwitch = 204 => "KEYCODE_LANGUAGE_SWITCH",
    Contacts = 207 => "KEYCODE_CONTACTS",
    Calendar = 208 => "KEYCODE_CALENDAR",
    Music = 209 => "KEYCODE_MUSIC",
    Calculator = 210 => "KEYCODE_CALCULATOR",
    Assist = 219 => "KEYCODE_ASSIST",
    BrightnessDown = 220 => "KEYCODE_BRIGHTNESS_DOWN",
    BrightnessUp = 221 => "KEYCODE_BRIGHTNESS_UP",
    MediaAudioTrack = 222 => "KEYCODE_MEDIA_AUDIO_TRACK",
    Sleep = 223 => "KEYCODE_SLEEP",
    Wakeup = 224 => "KEYCODE_WAKEUP",
    Pairing = 225 => "KEYCODE_PAIRING",
    MediaTopMenu = 226 => "KEYCODE_MEDIA_TOP_MENU",
    LastChannel = 229 => "KEYCODE_LAST_CHANNEL",
    TvDataService = 230 => "KEYCODE_TV_DATA_SERVICE",
    VoiceAssist = 231 => "KEYCODE_VOICE_ASSIST",
    TvRadioService = 232 => "KEYCODE_TV_RADIO_SERVICE",
    TvTeletext = 233 => "KEYCODE_TV_TELETEXT",
    Help = 259 => "KEYCODE_HELP",
    MediaSkipForward = 272 => "KEYCODE_MEDIA_SKIP_FORWARD",
    MediaSkipBackward = 273 => "KEYCODE_MEDIA_SKIP_BACKWARD",
    MediaStepForward = 274 => "KEYCODE_MEDIA_STEP_FORWARD",
    MediaStepBackward = 275 => "KEYCODE_MEDIA_STEP_BACKWARD",
    SoftSleep = 276 => "KEYCODE_SOFT_SLEEP",
}

impl fmt::Display for RemoteKeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

impl FromStr for RemoteKeyCode {
    type Err = ProtocolError;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_str_name(name).ok_or_else(|| ProtocolError::UnknownKeyCode(name.to_string()))
    }
}

/// How a key press is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RemoteDirection {
    UnknownDirection = 0,
    StartLong = 1,
    EndLong = 2,
    Short = 3,
}
